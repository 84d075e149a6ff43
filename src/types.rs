use serde::Serialize;

/// One converted game, serialized as a JSON object.
///
/// Header fields are the empty string when the source game does not carry the
/// tag. Field order here is the key order in the written document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GameRecord {
    pub event: String,
    pub site: String,
    pub date: String,
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String,

    /// Mainline half-moves in SAN, in play order.
    pub moves: Vec<String>,
}
