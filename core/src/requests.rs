use crate::models::CategoryFeed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub title: &'static str,
    pub path: &'static str,
}

pub const NOW_PLAYING: &str = "/movie/now_playing";
pub const TRENDING: &str = "/trending/all/week";
pub const TOP_RATED: &str = "/movie/top_rated";

pub const GENRE_ACTION: u32 = 28;
pub const GENRE_COMEDY: u32 = 35;
pub const GENRE_HORROR: u32 = 27;
pub const GENRE_ROMANCE: u32 = 10749;
pub const GENRE_DOCUMENTARY: u32 = 99;

/// Genres offered by the browse row's picker.
pub const GENRES: &[(u32, &str)] = &[
    (GENRE_ACTION, "Action"),
    (GENRE_COMEDY, "Comedy"),
    (GENRE_HORROR, "Horror"),
    (GENRE_ROMANCE, "Romance"),
    (GENRE_DOCUMENTARY, "Documentary"),
];

pub fn discover_by_genre(genre: u32) -> String {
    format!("/discover/movie?with_genres={genre}")
}

/// Rows shown on the home screen, top to bottom.
pub const CATEGORIES: &[Category] = &[
    Category { id: "now_playing", title: "Now Playing", path: NOW_PLAYING },
    Category { id: "trending", title: "Trending Now", path: TRENDING },
    Category { id: "top_rated", title: "Top Rated", path: TOP_RATED },
    Category { id: "action", title: "Action Movies", path: "/discover/movie?with_genres=28" },
    Category { id: "comedy", title: "Comedy Movies", path: "/discover/movie?with_genres=35" },
    Category { id: "horror", title: "Horror Movies", path: "/discover/movie?with_genres=27" },
    Category { id: "romance", title: "Romance Movies", path: "/discover/movie?with_genres=10749" },
    Category { id: "documentaries", title: "Documentaries", path: "/discover/movie?with_genres=99" },
];

pub fn default_feeds() -> Vec<CategoryFeed> {
    CATEGORIES
        .iter()
        .map(|c| CategoryFeed::new(c.id, c.title, c.path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn genre_rows_match_genre_codes() {
        let by_id = |id: &str| CATEGORIES.iter().find(|c| c.id == id).unwrap().path;
        assert_eq!(by_id("action"), discover_by_genre(GENRE_ACTION));
        assert_eq!(by_id("comedy"), discover_by_genre(GENRE_COMEDY));
        assert_eq!(by_id("horror"), discover_by_genre(GENRE_HORROR));
        assert_eq!(by_id("romance"), discover_by_genre(GENRE_ROMANCE));
        assert_eq!(by_id("documentaries"), discover_by_genre(GENRE_DOCUMENTARY));
    }

    #[test]
    fn row_ids_are_unique() {
        let ids: HashSet<_> = CATEGORIES.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), CATEGORIES.len());
    }

    #[test]
    fn default_feeds_start_empty() {
        let feeds = default_feeds();
        assert_eq!(feeds.len(), CATEGORIES.len());
        assert_eq!(feeds[0].path, NOW_PLAYING);
        assert!(feeds.iter().all(|f| f.items.is_empty()));
    }
}
