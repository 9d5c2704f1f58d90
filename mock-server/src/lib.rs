use std::{collections::HashMap, sync::Arc};

use axum::{
    body::{Body, Bytes},
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const MULTIPART_BOUNDARY: &str = "mock-boundary";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub text: String,
}

#[derive(Deserialize)]
pub struct NewNote {
    pub text: String,
}

/// JSON body sent with every rejected request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error_code: String,
    pub display_message: String,
}

/// What the echo route saw.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Note>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", get(get_note).put(update_note).delete(delete_note))
        .route("/echo", get(echo).post(echo).put(echo).delete(echo))
        .route("/fixtures/text", get(text_fixture))
        .route("/fixtures/binary", get(binary_fixture))
        .route("/fixtures/form", get(form_fixture))
        .route("/fixtures/multipart", get(multipart_fixture))
        .route("/fixtures/xml", get(xml_fixture))
        .route("/fixtures/untyped", get(untyped_fixture))
        .route("/status/{code}", get(status_fixture).delete(status_fixture))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type Rejection = (StatusCode, Json<ApiError>);

fn not_found(id: Uuid) -> Rejection {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error_code: "NOTE_NOT_FOUND".to_string(),
            display_message: format!("note {id} does not exist"),
        }),
    )
}

/// Store `input` under `id`, replacing any previous text.
fn save_note(notes: &mut HashMap<Uuid, Note>, id: Uuid, input: NewNote) -> Note {
    let note = Note { id, text: input.text };
    notes.insert(id, note.clone());
    note
}

async fn list_notes(State(db): State<Db>) -> Json<Vec<Note>> {
    let notes = db.read().await;
    Json(notes.values().cloned().collect())
}

async fn create_note(State(db): State<Db>, Json(input): Json<NewNote>) -> (StatusCode, Json<Note>) {
    let note = save_note(&mut *db.write().await, Uuid::new_v4(), input);
    (StatusCode::CREATED, Json(note))
}

async fn get_note(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Note>, Rejection> {
    let notes = db.read().await;
    notes.get(&id).cloned().map(Json).ok_or_else(|| not_found(id))
}

async fn update_note(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<NewNote>,
) -> Result<Json<Note>, Rejection> {
    let mut notes = db.write().await;
    if !notes.contains_key(&id) {
        return Err(not_found(id));
    }
    Ok(Json(save_note(&mut notes, id, input)))
}

async fn delete_note(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, Rejection> {
    let mut notes = db.write().await;
    notes
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found(id))
}

async fn echo(
    method: axum::http::Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(Echo {
        method: method.to_string(),
        query,
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn text_fixture() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "plain hello")
}

async fn binary_fixture() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/octet-stream")],
        vec![0u8, 159, 146, 150],
    )
}

async fn form_fixture() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/x-www-form-encoded")],
        "name=Andr%C3%A9&hobby=surf+and+climb",
    )
}

async fn multipart_fixture() -> impl IntoResponse {
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"title\"\r\n\r\n\
         report\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"r.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         a,b\r\n\
         --{b}--\r\n",
        b = MULTIPART_BOUNDARY
    );
    (
        [(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )],
        body,
    )
}

async fn xml_fixture() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/xml")], "<note/>")
}

async fn untyped_fixture() -> Response {
    Response::new(Body::from("no content type"))
}

async fn status_fixture(Path(code): Path<u16>) -> Response {
    let status = match StatusCode::from_u16(code) {
        Ok(status) => status,
        Err(_) => return StatusCode::BAD_REQUEST.into_response(),
    };
    let error = ApiError {
        error_code: format!("E{code}"),
        display_message: format!("status {code} requested"),
    };
    (status, Json(error)).into_response()
}
