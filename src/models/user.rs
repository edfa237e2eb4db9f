use serde::{Deserialize, Serialize};
use super::todo::Todo;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,  // Argon2 PHC string, never sent to clients
    pub todos: Vec<Todo>,       // Insertion order
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            password_hash,
            todos: Vec::new(),
        }
    }
}

/// What other users may see of an account.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub todos: Vec<Todo>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            todos: user.todos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_view_drops_password_hash() {
        let mut user = User::new("alice".into(), "$argon2id$v=19$secret".into());
        user.todos.push(Todo::new("buy milk".into(), false));

        let json = serde_json::to_value(PublicUser::from(user.clone())).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["id"], user.id.as_str());
        assert_eq!(json["todos"][0]["task"], "buy milk");
        assert!(json.get("password_hash").is_none());
    }
}
