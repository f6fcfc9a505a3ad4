use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use pocketbook::{
    Email, NewTransaction, PasswordHash, TransactionType, ValidatedPassword, create_transaction,
    create_user, initialize_db,
};

/// A utility for creating a test database for the pocketbook server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user 'test@example.com' with password 'test'...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;

    let user = create_user(
        Email::new_unchecked("test@example.com".to_owned()),
        password_hash,
        &conn,
    )?;

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();
    let samples = [
        ("Salary", 3200.0, TransactionType::Income, "Salary", 28),
        ("Rent", 1200.0, TransactionType::Expense, "Housing", 27),
        ("Weekly shop", 84.3, TransactionType::Expense, "Groceries", 14),
        ("Coffee", 4.5, TransactionType::Expense, "Eating out", 3),
        ("Sold old bike", 150.0, TransactionType::Income, "Other", 2),
        ("Weekly shop", 91.2, TransactionType::Expense, "Groceries", 1),
    ];

    for (title, amount, transaction_type, category, days_ago) in samples {
        create_transaction(
            NewTransaction {
                title: title.to_owned(),
                amount,
                transaction_type,
                category: category.to_owned(),
                date: today - Duration::days(days_ago),
            },
            user.id,
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
