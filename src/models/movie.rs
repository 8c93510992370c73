use serde::{Deserialize, Serialize};

/// One cast entry on a movie. Field names on the wire stay camelCase to
/// match the payloads existing clients already send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub actor_name: String,
    pub character_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: String,
    pub genre: String,
    pub actors: Vec<Actor>,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub created_at: String,
}

/// Fields of a movie before the store has assigned it an identifier.
#[derive(Debug, Clone)]
pub struct MovieInput {
    pub title: String,
    pub year: String,
    pub genre: String,
    pub actors: Vec<Actor>,
    pub image_url: String,
}
