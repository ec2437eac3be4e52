use std::io::Write;

use chrono::{DateTime, Utc};
use crossterm::style::{ContentStyle, Stylize};

use crate::text;
use crate::types::{Category, Error, Issue};
use crate::util::relative_time_ago;

pub const TITLE_WIDTH: usize = 33;
pub const UPDATED_WIDTH: usize = 17;
pub const COLUMN_PADDING: usize = 2;
pub const RULE_WIDTH: usize = 80;

// Styling is plain data handed to the renderer, not process-wide state.
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    pub section: ContentStyle,
    pub header: ContentStyle,
    pub title: ContentStyle,
    pub time: ContentStyle,
    pub url: ContentStyle,
    pub rule: ContentStyle,
    pub notice: ContentStyle,
}

impl Styles {
    pub fn color() -> Self {
        Self {
            section: ContentStyle::new().magenta().bold(),
            header: ContentStyle::new().green().bold(),
            title: ContentStyle::new().cyan(),
            time: ContentStyle::new().yellow(),
            url: ContentStyle::new().blue().underlined(),
            rule: ContentStyle::new().dark_grey(),
            notice: ContentStyle::new().yellow(),
        }
    }

    // No colors or attributes set, so apply() writes the bare text.
    pub fn plain() -> Self {
        Self {
            section: ContentStyle::new(),
            header: ContentStyle::new(),
            title: ContentStyle::new(),
            time: ContentStyle::new(),
            url: ContentStyle::new(),
            rule: ContentStyle::new(),
            notice: ContentStyle::new(),
        }
    }
}

pub fn render(
    out: &mut impl Write,
    styles: &Styles,
    category: Category,
    login: &str,
    issues: &[Issue],
    now: DateTime<Utc>,
) -> Result<(), Error> {
    let heading = format!("{} {} {}", category.icon(), category.heading(), login);
    writeln!(out)?;
    writeln!(out, "{}", styles.section.apply(heading))?;
    writeln!(out)?;

    if issues.is_empty() {
        writeln!(out, "{}", styles.notice.apply("No pull requests found"))?;
        writeln!(out)?;
        return Ok(());
    }

    let gap = " ".repeat(COLUMN_PADDING);
    writeln!(
        out,
        "{}{gap}{}{gap}{}",
        styles.header.apply(text::fit("Title", TITLE_WIDTH)),
        styles.header.apply(text::fit("Updated", UPDATED_WIDTH)),
        styles.header.apply("URL"),
    )?;
    writeln!(out, "{}", styles.rule.apply("-".repeat(RULE_WIDTH)))?;

    for issue in issues {
        let (title, url, updated_at) = issue.display_fields()?;
        writeln!(
            out,
            "{}{gap}{}{gap}{}",
            styles.title.apply(text::fit(title, TITLE_WIDTH)),
            styles
                .time
                .apply(text::fit(&relative_time_ago(now, updated_at), UPDATED_WIDTH)),
            styles.url.apply(url),
        )?;
    }
    writeln!(out)?;

    Ok(())
}
