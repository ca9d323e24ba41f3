//! Client-side form validation.
//!
//! Registration input is checked here before anything is sent to the
//! backend, mirroring the server's own rules so obviously bad input never
//! costs a round trip.

/// Validate a username: a letter followed by 3 to 23 characters from
/// `[A-Za-z0-9-_]` (4 to 24 total).
pub fn is_valid_username(s: &str) -> bool {
    if s.len() < 4 || s.len() > 24 {
        return false;
    }
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validate a password: 8 to 24 characters including a lowercase letter, an
/// uppercase letter, a digit, and one of `!@#$%`.
pub fn is_valid_password(s: &str) -> bool {
    if s.len() < 8 || s.len() > 24 {
        return false;
    }
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = s.chars().any(|c| c.is_ascii_digit());
    let has_special = s.chars().any(|c| "!@#$%".contains(c));
    has_lower && has_upper && has_digit && has_special
}

/// Raw registration form fields, as typed
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub budget: String,
}

/// Check a registration form. Returns the parsed budget on success or the
/// first problem found, in field order.
pub fn check_registration(form: &RegistrationInput) -> Result<f64, String> {
    if form.firstname.trim().is_empty() || form.lastname.trim().is_empty() {
        return Err("First and last name are required".to_string());
    }
    if !is_valid_username(&form.username) {
        return Err(
            "Username must be 4-24 characters and begin with a letter".to_string(),
        );
    }
    if form.email.trim().is_empty() || !form.email.contains('@') {
        return Err("A valid email address is required".to_string());
    }
    if !is_valid_password(&form.password) {
        return Err(
            "Password must be 8-24 characters with upper and lower case, a number, and one of !@#$%"
                .to_string(),
        );
    }
    if form.password != form.confirm_password {
        return Err("Passwords do not match".to_string());
    }
    let budget: f64 = form
        .budget
        .trim()
        .parse()
        .map_err(|_| "Monthly budget must be a number".to_string())?;
    if budget < 0.0 {
        return Err("Monthly budget cannot be negative".to_string());
    }
    Ok(budget)
}

/// Check the transaction entry form. Returns the parsed amount.
pub fn check_transaction(amount: &str, description: &str) -> Result<f64, String> {
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|_| "Amount must be a number".to_string())?;
    if amount <= 0.0 {
        return Err("Amount must be greater than zero".to_string());
    }
    if description.trim().is_empty() {
        return Err("Description is required".to_string());
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("ada_l"));
        assert!(is_valid_username("Ada-Lovelace_1815"));

        assert!(!is_valid_username("1ada")); // must begin with a letter
        assert!(!is_valid_username("ada")); // too short
        assert!(!is_valid_username("a".repeat(25).as_str())); // too long
        assert!(!is_valid_username("ada lovelace")); // no spaces
        assert!(!is_valid_username(""));
    }

    #[test]
    fn test_password_rules() {
        assert!(is_valid_password("Str0ng!pw"));
        assert!(is_valid_password("aB3$efgh"));

        assert!(is_valid_password("short1!A")); // exactly 8 characters
        assert!(!is_valid_password("nouppercase1!"));
        assert!(!is_valid_password("NOLOWERCASE1!"));
        assert!(!is_valid_password("NoDigits!!"));
        assert!(!is_valid_password("NoSpecial99"));
        assert!(!is_valid_password("A1!a")); // too short
    }

    #[test]
    fn test_registration_rejects_bad_username() {
        let form = RegistrationInput {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            username: "1ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "Str0ng!pw".to_string(),
            confirm_password: "Str0ng!pw".to_string(),
            budget: "1500".to_string(),
        };
        let err = check_registration(&form).unwrap_err();
        assert!(err.contains("Username"));
    }

    #[test]
    fn test_registration_rejects_mismatched_passwords() {
        let form = RegistrationInput {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            username: "ada_l".to_string(),
            email: "ada@example.com".to_string(),
            password: "Str0ng!pw".to_string(),
            confirm_password: "Str0ng!pw2".to_string(),
            budget: "1500".to_string(),
        };
        assert!(check_registration(&form).is_err());
    }

    #[test]
    fn test_registration_accepts_valid_form() {
        let form = RegistrationInput {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            username: "ada_l".to_string(),
            email: "ada@example.com".to_string(),
            password: "Str0ng!pw".to_string(),
            confirm_password: "Str0ng!pw".to_string(),
            budget: "1500".to_string(),
        };
        assert_eq!(check_registration(&form).unwrap(), 1500.0);
    }

    #[test]
    fn test_transaction_amount_must_be_positive() {
        assert!(check_transaction("0", "Coffee").is_err());
        assert!(check_transaction("-5", "Coffee").is_err());
        assert!(check_transaction("abc", "Coffee").is_err());
        assert!(check_transaction("5.25", "").is_err());
        assert_eq!(check_transaction("5.25", "Coffee").unwrap(), 5.25);
    }
}
