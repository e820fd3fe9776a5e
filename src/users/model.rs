//! User records and request payloads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::request::Validate;
use crate::http::response::FieldViolation;

/// Longest accepted user name, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Oldest accepted age.
pub const AGE_MAX: i64 = 150;

/// Unique user identifier, assigned by the store.
pub type UserId = u64;

/// A stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
}

/// Body of `POST /users` and `PUT /users/{id}`, before validation.
///
/// `age` is kept loose until validation: integral floats (`30.0`) and
/// numeric strings (`"30"`) are accepted as integers.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<Value>,
}

/// A payload whose constraints have been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
}

impl NewUser {
    pub(crate) fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            age: self.age,
        }
    }
}

impl Validate for UserPayload {
    type Output = NewUser;

    fn validate(self) -> Result<NewUser, Vec<FieldViolation>> {
        let mut violations = Vec::new();

        let name_len = self.name.chars().count();
        if name_len == 0 {
            violations.push(FieldViolation::new("name", "must be at least 1 character"));
        } else if name_len > NAME_MAX_CHARS {
            violations.push(FieldViolation::new(
                "name",
                format!("must be at most {NAME_MAX_CHARS} characters"),
            ));
        }

        if self.email.is_empty() {
            violations.push(FieldViolation::new("email", "must not be empty"));
        }

        let age = match self.age {
            None => None,
            Some(age) => match integer(&age).and_then(|age| u8::try_from(age).ok()) {
                Some(age) if i64::from(age) <= AGE_MAX => Some(age),
                _ => {
                    violations.push(FieldViolation::new(
                        "age",
                        format!("must be between 0 and {AGE_MAX}"),
                    ));
                    None
                }
            },
        };

        if !violations.is_empty() {
            return Err(violations);
        }

        Ok(NewUser {
            name: self.name,
            email: self.email,
            age,
        })
    }
}

/// Integer value of a JSON number or numeric string, if it has one.
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
