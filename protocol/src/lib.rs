//! Wire types for the puzzle validation service.
//!
//! The server owns all puzzle logic; the client only mirrors these bodies.

use serde::{Deserialize, Serialize};

/// Row-major digit rows as they cross the wire, 0 = blank.
pub type GridRows = [[u8; 9]; 9];

pub const PUZZLE_ENDPOINT: &str = "/api/puzzle";
pub const VALIDATE_ENDPOINT: &str = "/api/validate";
pub const CHECK_ENDPOINT: &str = "/api/check";

/// `GET /api/puzzle` response: a puzzle session id and its clue layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleResponse {
    pub id: String,
    pub givens: GridRows,
}

/// `POST /api/validate` body: one cell placement to legality-check.
/// Idempotent and side-effect-free on the server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub id: String,
    pub row: u8,
    pub col: u8,
    pub value: u8,
}

/// `POST /api/validate` response. `reason` only accompanies a rejection
/// (e.g. `"fixed_cell"`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `POST /api/check` body: the full working grid of a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckRequest {
    pub id: String,
    pub grid: GridRows,
}

/// `POST /api/check` response: whether every cell is filled and whether
/// everything filled so far is correct.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub complete: bool,
    pub valid: bool,
}

/// JSON body the server sends alongside non-2xx statuses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
