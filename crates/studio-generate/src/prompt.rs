//! Prompt template for blog drafts.

use chrono::{NaiveDate, Utc};

use crate::brief::{ContentBrief, Tone};

/// Text used when a brief carries no keywords.
pub const NO_KEYWORDS: &str = "none specified";

/// Source of "today" for the prompt's date line.
pub trait Clock: Send + Sync {
    /// The current calendar date.
    fn today(&self) -> NaiveDate;
}

/// Wall clock, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Render the generation prompt for a brief.
///
/// The output is deterministic for a given brief and date.
pub fn build_prompt(brief: &ContentBrief, today: NaiveDate) -> String {
    let tone_styles: String = Tone::ALL
        .iter()
        .map(|t| format!("  · {}: {}\n", t.as_str(), t.style()))
        .collect();

    format!(
        "You are an expert content writer for BenEl Marketing Hub, a professional blog covering sales, marketing, and branding. Write a complete, publish-ready MDX blog post.

Topic: {topic}
Category: {category}
Tone: {tone}
Keywords to include: {keywords}

Requirements:
- Length: 800-1200 words
- Include proper MDX frontmatter:
  title, date ({today}), excerpt, category, tags (array), author: 'BenEl Team', readTime (e.g. '5 min read')
- Structure:
  · Compelling introduction that hooks the reader
  · 3-5 main sections with ## headings
  · Practical actionable takeaways
  · Strong conclusion with a CTA
  · Use **bold** for key terms
  · Include at least one > blockquote for a key insight
- Tone style:
{tone_styles}
Return ONLY the MDX content starting with ---, nothing else.",
        topic = brief.topic(),
        category = brief.category(),
        tone = brief.tone(),
        keywords = brief.keywords().unwrap_or(NO_KEYWORDS),
        today = today.format("%Y-%m-%d"),
    )
}
