//! Draws viewable objects into a terminal window.

use crate::count::TopicCount;
use crate::generator::ScoredPost;
use crate::news::NewsItem;
use crate::persona::Persona;
use crate::threads::{Insights, Receipt};
use colored::{ColoredString, Colorize};
use indoc::formatdoc;
use itertools::Itertools;

/// View renderer options.
#[derive(Debug, Default)]
pub struct ViewOptions {
    oneline: bool,
    details: bool,
}

impl ViewOptions {
    /// Incrementally builds a new set of view options.
    ///
    /// # Examples
    ///
    /// ```
    /// use threadsmith::view::ViewOptions;
    /// let opts = ViewOptions::build().oneline(true).details(false).build();
    /// ```
    pub fn build() -> ViewOptionsBuilder {
        ViewOptionsBuilder::default()
    }
}

/// A builder for view options.
///
/// You probably don't want to use this directly; call [`ViewOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct ViewOptionsBuilder {
    oneline: bool,
    details: bool,
}

impl ViewOptionsBuilder {
    /// Sets the "oneline" option to true or false.
    pub fn oneline(mut self, oneline: bool) -> Self {
        self.oneline = oneline;
        self
    }

    /// Sets the "details" option to true or false.
    pub fn details(mut self, details: bool) -> Self {
        self.details = details;
        self
    }

    /// Finalizes the [`ViewOptions`].
    pub fn build(self) -> ViewOptions {
        ViewOptions {
            oneline: self.oneline,
            details: self.details,
        }
    }
}

/// Marks an item that can be converted into a string for display on a terminal.
pub trait Viewable {
    /// Converts the item into a string for display on a terminal.
    fn view(&self, opts: &ViewOptions) -> String;
}

/// A colored dot grading a composite score.
///
/// Green means the candidate is likely to travel (80+), yellow means
/// solid (60+), red means it needs work. The thresholds match the stage
/// expectations: 80+ posts tend to clear Stage3, 60+ hold Stage2.
pub fn score_badge(score: f64) -> ColoredString {
    if score >= 80.0 {
        "●".green()
    } else if score >= 60.0 {
        "●".yellow()
    } else {
        "●".red()
    }
}

impl Viewable for ScoredPost {
    fn view(&self, opts: &ViewOptions) -> String {
        let draft = self.draft();
        let badge = score_badge(self.composite());

        if opts.oneline {
            let first_line = draft.post_text().lines().next().unwrap_or_default();
            return format!("{} {:5.1}  {}", badge, self.composite(), first_line);
        }

        let tag = draft.topic_tag().unwrap_or("(no tag)");
        let mut s = format!(
            "{} {:.1}  {}  ({} chars, {})\n\n{}",
            badge,
            self.composite(),
            tag.bold(),
            draft.char_count(),
            draft.stage(),
            draft.post_text(),
        );

        if opts.details {
            s += "\n";
            for (metric, score) in self.details().iter() {
                s += &format!("\n  {:<22} {:>5.1}", metric.to_string(), score);
            }
            s += &format!(
                "\n  {:<22} {:>5.1}  (advisory)",
                "human likeness",
                self.human_likeness()
            );
            if !draft.conversation_note().is_empty() {
                s += &format!("\n\n  replies because: {}", draft.conversation_note());
            }
            if !draft.reasoning().is_empty() {
                s += &format!("\n  reasoning: {}", draft.reasoning());
            }
        }

        s
    }
}

impl Viewable for NewsItem {
    fn view(&self, opts: &ViewOptions) -> String {
        let published = self
            .published()
            .map(|date| date.format("%b %d, %Y %H:%M").to_string())
            .unwrap_or_else(|| String::from("undated"));

        if opts.oneline {
            return format!("{}  {}", published, self.title());
        }

        formatdoc! {"
            {}
            {} | {}
            {}",
            self.title().bold(),
            published,
            self.link(),
            textwrap::fill(self.summary(), 76),
        }
    }
}

impl Viewable for Vec<TopicCount> {
    fn view(&self, _: &ViewOptions) -> String {
        if self.is_empty() {
            return String::from("None of the configured topics are moving right now.");
        }
        let width = self
            .iter()
            .map(|(topic, _)| topic.chars().count())
            .max()
            .unwrap_or(0);
        self.iter()
            .map(|(topic, count)| format!("{:<width$}  {:>4}", topic, count))
            .join("\n")
    }
}

impl Viewable for Persona {
    fn view(&self, _: &ViewOptions) -> String {
        formatdoc! {"
            {}
            Specialty: {}
            Tone: {}
            Values: {}
            Audience: {}
            Goals: {}",
            self.name.bold(),
            self.specialty,
            self.tone,
            self.values,
            self.target_audience,
            self.goals,
        }
    }
}

impl Viewable for Receipt {
    fn view(&self, _: &ViewOptions) -> String {
        format!(
            "Published post {} at {}",
            self.post_id(),
            self.published_at().to_rfc3339(),
        )
    }
}

impl Viewable for Insights {
    fn view(&self, _: &ViewOptions) -> String {
        formatdoc! {"
            Views:   {:>6}
            Likes:   {:>6}
            Replies: {:>6}
            Reposts: {:>6}
            Quotes:  {:>6}",
            self.views,
            self.likes,
            self.replies,
            self.reposts,
            self.quotes,
        }
    }
}
