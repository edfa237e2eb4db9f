use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script};
use std::collections::HashMap;
use std::sync::Arc;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Todo, User};
use super::store::UserStore;

const USERS_KEY: &str = "todo:users";

// Claims the username, writes the user hash and records registration order.
const REGISTER_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 0
end
redis.call('SET', KEYS[1], ARGV[1])
redis.call('HSET', KEYS[2], 'id', ARGV[1], 'username', ARGV[2], 'password_hash', ARGV[3])
redis.call('RPUSH', KEYS[3], ARGV[1])
return 1
"#;

const PUSH_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return {'missing_user', {}}
end
redis.call('RPUSH', KEYS[2], ARGV[1])
return {'ok', redis.call('LRANGE', KEYS[2], 0, -1)}
"#;

const PULL_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return {'missing_user', {}}
end
local items = redis.call('LRANGE', KEYS[2], 0, -1)
for _, raw in ipairs(items) do
  local ok, todo = pcall(cjson.decode, raw)
  if ok and todo['id'] == ARGV[1] then
    redis.call('LREM', KEYS[2], 1, raw)
    break
  end
end
return {'ok', redis.call('LRANGE', KEYS[2], 0, -1)}
"#;

const SET_COMPLETED_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return {'missing_user', {}}
end
local raw = redis.call('LINDEX', KEYS[2], ARGV[1])
if not raw then
  return {'missing_task', {}}
end
local todo = cjson.decode(raw)
todo['completed'] = (ARGV[2] == 'true')
redis.call('LSET', KEYS[2], ARGV[1], cjson.encode(todo))
return {'ok', redis.call('LRANGE', KEYS[2], 0, -1)}
"#;

fn username_key(username: &str) -> String {
    format!("todo:username:{}", username)
}

fn user_key(user_id: &str) -> String {
    format!("todo:user:{}", user_id)
}

fn todos_key(user_id: &str) -> String {
    format!("todo:user:{}:todos", user_id)
}

/// Redis list indices are signed 64-bit; anything larger cannot name a todo.
fn list_index(index: usize) -> Option<i64> {
    i64::try_from(index).ok()
}

fn decode_todos(raw: &[String]) -> StoreResult<Vec<Todo>> {
    raw.iter()
        .map(|item| serde_json::from_str(item).map_err(StoreError::from))
        .collect()
}

/// Outcome reported by the mutation scripts.
enum ScriptStatus {
    Ok(Vec<Todo>),
    MissingUser,
    MissingTask,
}

fn parse_script_reply(reply: (String, Vec<String>)) -> StoreResult<ScriptStatus> {
    let (status, raw) = reply;
    match status.as_str() {
        "ok" => Ok(ScriptStatus::Ok(decode_todos(&raw)?)),
        "missing_user" => Ok(ScriptStatus::MissingUser),
        "missing_task" => Ok(ScriptStatus::MissingTask),
        other => Err(StoreError::Corrupt(format!("unexpected script status {}", other))),
    }
}

/// Redis-backed user store. Each user is a hash plus a list of JSON todos;
/// every mutation runs as a single Lua script so it is atomic per user.
pub struct RedisStore {
    client: Arc<Client>,
    register: Script,
    push: Script,
    pull: Script,
    set_completed: Script,
}

impl RedisStore {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            register: Script::new(REGISTER_SCRIPT),
            push: Script::new(PUSH_SCRIPT),
            pull: Script::new(PULL_SCRIPT),
            set_completed: Script::new(SET_COMPLETED_SCRIPT),
        }
    }

    /// Opens the client and checks the server answers before serving traffic.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let client = Arc::new(Client::open(url)?);
        let mut conn = client.get_async_connection().await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        tracing::info!("Connected to Redis at {}", url);
        Ok(Self::new(client))
    }

    async fn connection(&self) -> StoreResult<redis::aio::Connection> {
        Ok(self.client.get_async_connection().await?)
    }

    async fn load_user(
        &self,
        conn: &mut redis::aio::Connection,
        user_id: &str,
    ) -> StoreResult<Option<User>> {
        let fields: HashMap<String, String> = conn.hgetall(user_key(user_id)).await?;
        if fields.is_empty() {
            return Ok(None);
        }
        let raw_todos: Vec<String> = conn.lrange(todos_key(user_id), 0, -1).await?;

        let field = |name: &str| {
            fields
                .get(name)
                .cloned()
                .ok_or_else(|| StoreError::Corrupt(format!("user {} lacks {}", user_id, name)))
        };

        Ok(Some(User {
            id: field("id")?,
            username: field("username")?,
            password_hash: field("password_hash")?,
            todos: decode_todos(&raw_todos)?,
        }))
    }
}

#[async_trait]
impl UserStore for RedisStore {
    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let inserted: i32 = self
            .register
            .key(username_key(&user.username))
            .key(user_key(&user.id))
            .key(USERS_KEY)
            .arg(&user.id)
            .arg(&user.username)
            .arg(&user.password_hash)
            .invoke_async(&mut conn)
            .await?;

        if inserted == 0 {
            return Err(StoreError::DuplicateUsername(user.username.clone()));
        }
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let mut conn = self.connection().await?;
        let user_id: Option<String> = conn.get(username_key(username)).await?;
        match user_id {
            Some(id) => self.load_user(&mut conn, &id).await,
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, user_id: &str) -> StoreResult<Option<User>> {
        let mut conn = self.connection().await?;
        self.load_user(&mut conn, user_id).await
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut conn = self.connection().await?;
        let ids: Vec<String> = conn.lrange(USERS_KEY, 0, -1).await?;

        let mut users = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.load_user(&mut conn, id).await? {
                Some(user) => users.push(user),
                None => tracing::warn!("User {} listed but has no record", id),
            }
        }
        Ok(users)
    }

    async fn push_todo(&self, user_id: &str, todo: &Todo) -> StoreResult<Vec<Todo>> {
        let mut conn = self.connection().await?;
        let reply: (String, Vec<String>) = self
            .push
            .key(user_key(user_id))
            .key(todos_key(user_id))
            .arg(serde_json::to_string(todo)?)
            .invoke_async(&mut conn)
            .await?;

        match parse_script_reply(reply)? {
            ScriptStatus::Ok(todos) => Ok(todos),
            ScriptStatus::MissingUser => Err(StoreError::UserNotFound(user_id.to_string())),
            ScriptStatus::MissingTask => Err(StoreError::Corrupt("push reported missing task".into())),
        }
    }

    async fn pull_todo(&self, user_id: &str, todo_id: &str) -> StoreResult<Vec<Todo>> {
        let mut conn = self.connection().await?;
        let reply: (String, Vec<String>) = self
            .pull
            .key(user_key(user_id))
            .key(todos_key(user_id))
            .arg(todo_id)
            .invoke_async(&mut conn)
            .await?;

        match parse_script_reply(reply)? {
            ScriptStatus::Ok(todos) => Ok(todos),
            ScriptStatus::MissingUser => Err(StoreError::UserNotFound(user_id.to_string())),
            ScriptStatus::MissingTask => Err(StoreError::Corrupt("pull reported missing task".into())),
        }
    }

    async fn set_todo_completed(
        &self,
        user_id: &str,
        index: usize,
        completed: bool,
    ) -> StoreResult<Option<Vec<Todo>>> {
        let Some(index) = list_index(index) else {
            return Ok(None);
        };

        let mut conn = self.connection().await?;
        let reply: (String, Vec<String>) = self
            .set_completed
            .key(user_key(user_id))
            .key(todos_key(user_id))
            .arg(index)
            .arg(if completed { "true" } else { "false" })
            .invoke_async(&mut conn)
            .await?;

        match parse_script_reply(reply)? {
            ScriptStatus::Ok(todos) => Ok(Some(todos)),
            ScriptStatus::MissingUser => Err(StoreError::UserNotFound(user_id.to_string())),
            ScriptStatus::MissingTask => Ok(None),
        }
    }
}
