//! Password Form
//!
//! This example demonstrates a sign-up form with a password confirmation.
//!
//! Key concepts:
//! - Fields validate themselves on every change
//! - A confirmation field is re-validated when the password changes
//! - Empty-allowed fields stay valid while blank
//! - The form reports every failing field at once
//!
//! Run with: cargo run --example password_form

use fieldwise::display::bind_error;
use fieldwise::form::FormEvent;
use fieldwise::{FieldBuilder, ValidatedForm};
use stillwater::validation::Validation;

fn main() {
    println!("=== Password Form Example ===\n");

    let form = ValidatedForm::new();
    let _validity = form.subscribe(|event| {
        if let FormEvent::ValidityChanged { is_valid } = event {
            println!("  [form] submit enabled: {is_valid}");
        }
    });

    let password = FieldBuilder::new()
        .require("Password is required", |s: &String| !s.is_empty())
        .require("Use at least 6 characters", |s: &String| s.len() >= 6)
        .build();
    let confirm = FieldBuilder::new()
        .verify("Passwords do not match", &password)
        .build();
    let nickname = FieldBuilder::new()
        .empty_allowed(true)
        .require("Nickname must be alphanumeric", |s: &String| {
            s.chars().all(char::is_alphanumeric)
        })
        .build();

    form.add_field(&password)
        .add_field(&confirm)
        .add_field(&nickname);

    let _password_error = bind_error(&password, |msg: Option<&str>| {
        println!("  [password] error: {}", msg.unwrap_or("-"));
    });
    let _confirm_error = bind_error(&confirm, |msg: Option<&str>| {
        println!("  [confirm]  error: {}", msg.unwrap_or("-"));
    });

    println!("\nStep 1: short password");
    password.set("abc".to_string());

    println!("\nStep 2: longer password");
    password.set("abcdef".to_string());

    println!("\nStep 3: confirmation typo");
    confirm.set("abcdeg".to_string());

    println!("\nStep 4: fix confirmation");
    confirm.set("abcdef".to_string());

    println!("\nStep 5: blank nickname is fine");
    nickname.set(String::new());

    println!("\nStep 6: change password, confirmation re-validates");
    password.set("abcdefg".to_string());

    println!("\nForm problems:");
    match form.validate() {
        Validation::Success(_) => println!("  none"),
        Validation::Failure(errors) => {
            for error in errors.iter() {
                println!("  - {error}");
            }
        }
    }

    println!("\n=== Example Complete ===");
}
