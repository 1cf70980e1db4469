//! Plain-text output for the CLI.

use taskflow_core::timestamp::format_timestamp;
use taskflow_core::{Category, CompletedStats, Task, TaskStats};
use unicode_segmentation::UnicodeSegmentation;

const TITLE_WIDTH: usize = 40;

pub fn task_table(tasks: &[Task], categories: &[Category]) {
    println!("ID | Done | Priority | Due | Category | Title");
    println!("-- | ---- | -------- | --- | -------- | -----");

    for task in tasks {
        let done = if task.completed { "x" } else { " " };
        let due = task.due_date.map_or_else(|| "-".to_owned(), format_timestamp);
        println!(
            "{} | [{done}] | {} | {due} | {} | {}",
            task.id,
            task.priority,
            category_name(task, categories),
            truncate(&task.title, TITLE_WIDTH)
        );
    }
}

pub fn task_detail(task: &Task, category: Option<&Category>) {
    println!("{} ({})", task.title, task.id);
    println!(
        "  status:    {}",
        if task.completed { "completed" } else { "pending" }
    );
    println!("  priority:  {}", task.priority);
    println!(
        "  category:  {}",
        category.map_or("-", |category| category.name.as_str())
    );
    if let Some(due) = task.due_date {
        println!("  due:       {}", format_timestamp(due));
    }
    println!("  created:   {}", format_timestamp(task.created_at));
    if let Some(completed_at) = task.completed_at {
        println!("  completed: {}", format_timestamp(completed_at));
    }
    if !task.description.is_empty() {
        println!();
        println!("{}", task.description);
    }
}

pub fn task_stats(stats: &TaskStats) {
    println!("Total:      {}", stats.total);
    println!("Pending:    {}", stats.pending);
    println!("Completed:  {}", stats.completed);
    println!("Overdue:    {}", stats.overdue);
    println!("Completion: {}%", stats.completion_rate);
}

pub fn completed_stats(stats: &CompletedStats) {
    println!("Completed:  {}", stats.total_completed);
    println!("Today:      {}", stats.completed_today);
    println!("This week:  {}", stats.completed_this_week);
    println!();
}

pub fn category_table(categories: &[Category]) {
    println!("ID | Name | Color | Tasks");
    println!("-- | ---- | ----- | -----");
    for category in categories {
        println!(
            "{} | {} | {} | {}",
            category.id, category.name, category.color, category.task_count
        );
    }
}

/// Name of the task's category, or `-` when unset or dangling.
fn category_name<'a>(task: &Task, categories: &'a [Category]) -> &'a str {
    task.category_id
        .as_ref()
        .and_then(|id| categories.iter().find(|category| &category.id == id))
        .map_or("-", |category| category.name.as_str())
}

/// Cut `text` to at most `width` grapheme clusters, marking the cut with `…`.
fn truncate(text: &str, width: usize) -> String {
    let mut graphemes = text.graphemes(true);
    let head: String = graphemes.by_ref().take(width).collect();
    if graphemes.next().is_some() {
        let kept: String = head.graphemes(true).take(width.saturating_sub(1)).collect();
        format!("{kept}…")
    } else {
        head
    }
}
