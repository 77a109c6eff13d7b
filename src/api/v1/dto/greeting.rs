use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct GreetingResponse {
    pub message: String,
    pub locale: String,
    pub request_id: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub scheme: String,
    pub roles: Vec<String>,
    pub request_id: String,
}
