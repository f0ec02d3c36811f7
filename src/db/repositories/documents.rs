use crate::entities::{documents, prelude::*};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect, Set};

pub struct DocumentRepository {
    conn: DatabaseConnection,
}

impl DocumentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, DbErr> {
        let row = Documents::find_by_id(key.to_string())
            .one(&self.conn)
            .await?;
        Ok(row.map(|m| m.value))
    }

    pub async fn put(&self, key: &str, value: String) -> Result<(), DbErr> {
        let active_model = documents::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        };

        Documents::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(documents::Column::Key)
                    .update_columns([documents::Column::Value, documents::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<bool, DbErr> {
        let result = Documents::delete_by_id(key.to_string())
            .exec(&self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn keys(&self) -> Result<Vec<String>, DbErr> {
        Documents::find()
            .select_only()
            .column(documents::Column::Key)
            .order_by_asc(documents::Column::Key)
            .into_tuple::<String>()
            .all(&self.conn)
            .await
    }
}
