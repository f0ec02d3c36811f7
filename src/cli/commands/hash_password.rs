use crate::api::auth::hash_password;

pub fn cmd_hash_password(password: Option<&str>) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p.to_string(),
        None => {
            println!("Enter password:");
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            input.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        println!("Password cannot be empty.");
        return Ok(());
    }

    println!("{}", hash_password(&password)?);
    println!();
    println!("Put this value in config.toml under [admin] password_hash.");

    Ok(())
}
