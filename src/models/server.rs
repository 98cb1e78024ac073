use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PingResponse {
    pub res: String,
}

impl PingResponse {
    pub fn is_pong(&self) -> bool {
        self.res == "pong"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatusResponse {
    pub reachable: bool,
    pub user: Option<User>,
}
