use maud::html;

/// View
///
/// A renderable page component. `name` is the lowercase view identifier (the
/// chunk name for split views). `markup` is the HTML fragment placed inside the
/// application shell when the owning route is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub name: String,
    pub title: String,
    pub markup: String,
}

impl View {
    pub fn new(name: impl Into<String>, title: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            markup: markup.into(),
        }
    }
}

// Chunk names of the split views, in table order. `Home` is bundled.
pub const ABOUT_CHUNK: &str = "about";
pub const VOTERS_CHUNK: &str = "voters";
pub const TEAMS_CHUNK: &str = "teams";
pub const RESULTS_CHUNK: &str = "results";
pub const OVERVIEW_CHUNK: &str = "overview";

pub const LAZY_CHUNKS: [&str; 5] = [
    ABOUT_CHUNK,
    VOTERS_CHUNK,
    TEAMS_CHUNK,
    RESULTS_CHUNK,
    OVERVIEW_CHUNK,
];

/// The landing page, compiled into the main bundle.
pub fn home() -> View {
    let markup = html! {
        section class="home" {
            h1 { "/r/CollegeBasketball Poll" }
            p { "The weekly community top 25, voted on by the r/CollegeBasketball voters." }
            nav {
                a href="/results" { "Latest results" }
                a href="/voters" { "Voters" }
                a href="/teams" { "Teams" }
            }
        }
    };
    View::new("home", "Home", markup.into_string())
}

/// Title used for a chunk that does not declare one: the chunk name with its
/// first letter upper-cased.
pub fn default_title(chunk: &str) -> String {
    let mut chars = chunk.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
