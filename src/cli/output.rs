//! CLI output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::posts::Post;

/// Print a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print an error message
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Print a warning message
pub fn warn(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A post with its author's name resolved
pub struct PostRow {
    pub post: Post,
    pub author: Option<String>,
}

/// Print a table of posts
pub fn print_post_table(rows: &[PostRow]) {
    if rows.is_empty() {
        info("No posts yet");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Author").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for row in rows {
        let author = match &row.author {
            Some(name) => Cell::new(name),
            None => Cell::new("(deleted)").fg(Color::Red),
        };

        table.add_row(vec![
            Cell::new(&row.post.id),
            Cell::new(&row.post.title),
            author,
            Cell::new(row.post.created_at.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!("{table}");
}
