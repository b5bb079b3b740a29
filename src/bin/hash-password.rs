use bcrypt::{hash, DEFAULT_COST};
use std::env;

fn main() {
    let mut args = env::args().skip(1);
    let password = args.next().unwrap_or_else(|| {
        eprintln!("Usage: cargo run --bin hash-password <PASSWORD> [EMAIL] [NAME]");
        std::process::exit(1);
    });
    let email = args
        .next()
        .unwrap_or_else(|| "admin@akacorptech.com".to_string())
        .to_lowercase();
    let name = args.next().unwrap_or_else(|| "Site Admin".to_string());

    match hash(&password, DEFAULT_COST) {
        Ok(hashed) => {
            println!("\nCost     : {}", DEFAULT_COST);
            println!("Hash     : {}\n", hashed);
            println!("# Paste this into your .env:");
            println!("ADMIN_HASH_PASSWORD={}\n", hashed);
            println!("# Or seed the profile directly:");
            println!(
                "INSERT INTO profiles (id, name, email, role, password_hash) VALUES (gen_random_uuid(), '{}', '{}', 'admin', '{}');",
                name.replace('\'', "''"),
                email.replace('\'', "''"),
                hashed
            );
        }
        Err(e) => {
            eprintln!("Error hashing password: {}", e);
            std::process::exit(1);
        }
    }
}
