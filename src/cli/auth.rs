use std::error::Error;
use std::io::{self, BufRead, Write};

use crate::core::credentials::{remove_credential, store_credential, API_KEY_ENV};

pub fn run_auth() -> Result<(), Box<dyn Error>> {
    print!("Enter your OpenRouter API key: ");
    io::stdout().flush()?;

    let token = read_token(io::stdin().lock())?;
    store_credential(&token)?;
    println!("✓ API key stored in the system keyring");
    if std::env::var_os(API_KEY_ENV).is_some() {
        println!("Note: {API_KEY_ENV} is set and takes precedence over the stored key.");
    }
    Ok(())
}

pub fn run_deauth() -> Result<(), Box<dyn Error>> {
    if remove_credential()? {
        println!("✅ API key removed from the system keyring");
    } else {
        println!("No stored API key found");
    }
    Ok(())
}

fn read_token<R: BufRead>(mut input: R) -> Result<String, Box<dyn Error>> {
    let mut token = String::new();
    input.read_line(&mut token)?;
    let token = token.trim();
    if token.is_empty() {
        return Err("API key cannot be empty".into());
    }
    Ok(token.to_string())
}
