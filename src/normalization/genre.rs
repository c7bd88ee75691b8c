use std::collections::HashMap;

/// Genre assigned when none of a title's IDs are known.
pub const DEFAULT_GENRE: &str = "Drama";

/// TMDB movie genre IDs and their display names.
const TMDB_GENRES: [(i64, &str); 19] = [
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

/// Lookup table translating external genre IDs into display names.
#[derive(Debug, Default, Clone)]
pub struct GenreMapper {
    names: HashMap<i64, String>,
}

impl GenreMapper {
    /// Build a mapper seeded with the TMDB movie genres.
    pub fn with_defaults() -> Self {
        TMDB_GENRES
            .iter()
            .fold(Self::default(), |m, (id, name)| m.register(*id, *name))
    }

    /// Register or override the name for a genre ID.
    pub fn register(mut self, id: i64, name: impl Into<String>) -> Self {
        self.names.insert(id, name.into());
        self
    }

    /// Resolve every known ID in order; unknown IDs are skipped.
    /// Falls back to [`DEFAULT_GENRE`] when nothing resolves.
    pub fn resolve(&self, ids: &[i64]) -> Vec<String> {
        let mut out: Vec<String> = ids
            .iter()
            .filter_map(|id| self.names.get(id).cloned())
            .collect();
        if out.is_empty() {
            out.push(DEFAULT_GENRE.to_string());
        }
        out
    }

    /// The single genre kept on a DVD details row: the first that resolves.
    pub fn primary(&self, ids: &[i64]) -> String {
        // resolve never returns an empty list.
        self.resolve(ids).swap_remove(0)
    }
}
