use crate::Task;

/// Case-insensitive substring matcher over task title and description.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query into a matcher. Returns `None` for the empty query,
    /// which matches every task.
    ///
    /// Whitespace is part of the query: `" "` only matches text containing a space.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            needle: query.to_lowercase(),
        })
    }

    /// Whether the title or the description contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title) || self.matches_field(&task.description)
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}

/// Keep the tasks matching `query`; the empty query keeps everything.
#[must_use]
pub fn search<'a, I>(tasks: I, query: &str) -> Vec<Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let matcher = TextMatcher::new(query);
    tasks
        .into_iter()
        .filter(|task| matcher.as_ref().is_none_or(|m| m.matches(task)))
        .cloned()
        .collect()
}
