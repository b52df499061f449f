use super::*;

fn validate(username: &str, email: &str, password: &str, confirm: &str) -> Result<RegisterForm, &'static str> {
    validate_register_input(username, email, password, confirm)
}

#[test]
fn accepts_valid_form_and_trims_identity_fields() {
    assert_eq!(
        validate(" alice_01 ", " alice@example.com ", "password1", "password1"),
        Ok(RegisterForm {
            username: "alice_01".to_owned(),
            email: "alice@example.com".to_owned(),
            password: "password1".to_owned(),
        })
    );
}

#[test]
fn username_rules() {
    assert_eq!(validate("", "a@b.co", "password1", "password1"), Err("Enter a username."));
    assert_eq!(validate("ab", "a@b.co", "password1", "password1"), Err("Username must be at least 3 characters."));
    assert_eq!(
        validate("bad name", "a@b.co", "password1", "password1"),
        Err("Username may only contain letters, numbers, underscores and hyphens.")
    );
    assert!(validate("a-b_c", "a@b.co", "password1", "password1").is_ok());
}

#[test]
fn email_rules() {
    assert_eq!(validate("alice", " ", "password1", "password1"), Err("Enter your email."));
    assert_eq!(validate("alice", "alice", "password1", "password1"), Err("Enter a valid email address."));
}

#[test]
fn password_rules() {
    assert_eq!(validate("alice", "a@b.co", "", ""), Err("Enter a password."));
    assert_eq!(validate("alice", "a@b.co", "short", "short"), Err("Password must be at least 8 characters."));
    assert_eq!(validate("alice", "a@b.co", "password1", ""), Err("Confirm your password."));
    assert_eq!(validate("alice", "a@b.co", "password1", "password2"), Err("Passwords do not match."));
}
