//! Guided three-step reading: pick an issue, shuffle a pool, draw cards.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::deck::{MAJOR_ARCANA, TarotCard};
use crate::error::{ArcanaError, Result};
use crate::language::Language;

/// Pool sizes offered after the issue is chosen.
pub const POOL_SIZES: [usize; 4] = [5, 7, 10, 22];
/// Draw sizes offered once the pool is shuffled.
pub const DRAW_SIZES: [usize; 4] = [3, 5, 7, 10];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReadingIssue {
    Love,
    Work,
    Marriage,
    Studies,
    Interpersonal,
}

impl ReadingIssue {
    pub fn label(&self, lang: Language) -> &'static str {
        match (self, lang) {
            (Self::Love, Language::En) => "Love",
            (Self::Work, Language::En) => "Work",
            (Self::Marriage, Language::En) => "Marriage",
            (Self::Studies, Language::En) => "Studies",
            (Self::Interpersonal, Language::En) => "Interpersonal",
            (Self::Love, Language::Zh) => "爱情",
            (Self::Work, Language::Zh) => "工作",
            (Self::Marriage, Language::Zh) => "婚姻",
            (Self::Studies, Language::Zh) => "学业",
            (Self::Interpersonal, Language::Zh) => "人际关系",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingStage {
    Issue,
    Pool,
    Draw,
    /// Cards are drawn; the conversation continues freely.
    Chat,
}

/// State of one guided reading.
#[derive(Debug, Clone)]
pub struct TarotReading {
    stage: ReadingStage,
    issue: Option<ReadingIssue>,
    pool: Vec<&'static TarotCard>,
    drawn: Vec<&'static TarotCard>,
}

impl Default for TarotReading {
    fn default() -> Self {
        Self::new()
    }
}

impl TarotReading {
    pub fn new() -> Self {
        Self {
            stage: ReadingStage::Issue,
            issue: None,
            pool: Vec::new(),
            drawn: Vec::new(),
        }
    }

    pub fn stage(&self) -> ReadingStage {
        self.stage
    }

    pub fn issue(&self) -> Option<ReadingIssue> {
        self.issue
    }

    pub fn pool(&self) -> &[&'static TarotCard] {
        &self.pool
    }

    pub fn drawn(&self) -> &[&'static TarotCard] {
        &self.drawn
    }

    pub fn choose_issue(&mut self, issue: ReadingIssue) -> Result<()> {
        self.expect_stage(ReadingStage::Issue)?;
        self.issue = Some(issue);
        self.stage = ReadingStage::Pool;
        Ok(())
    }

    /// Picks `count` random cards of the deck as the pool to draw from.
    pub fn shuffle_pool<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<()> {
        self.expect_stage(ReadingStage::Pool)?;
        if !POOL_SIZES.contains(&count) {
            return Err(ArcanaError::validation(format!(
                "Pool size must be one of {POOL_SIZES:?}"
            )));
        }
        self.pool = MAJOR_ARCANA.iter().collect();
        self.pool.shuffle(rng);
        self.pool.truncate(count);
        self.stage = ReadingStage::Draw;
        Ok(())
    }

    /// Draws `count` distinct cards out of the pool.
    pub fn draw<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Result<&[&'static TarotCard]> {
        self.expect_stage(ReadingStage::Draw)?;
        if !DRAW_SIZES.contains(&count) {
            return Err(ArcanaError::validation(format!(
                "Draw size must be one of {DRAW_SIZES:?}"
            )));
        }
        if count > self.pool.len() {
            return Err(ArcanaError::validation(format!(
                "Cannot draw {count} cards from a pool of {}",
                self.pool.len()
            )));
        }
        self.drawn = self.pool.choose_multiple(rng, count).copied().collect();
        self.stage = ReadingStage::Chat;
        Ok(&self.drawn)
    }

    /// Question sent to the bot to interpret the drawn cards.
    pub fn interpretation_question(&self, lang: Language) -> Option<String> {
        let issue = self.issue?;
        if self.drawn.is_empty() {
            return None;
        }
        let names = self
            .drawn
            .iter()
            .map(|c| c.name(lang))
            .collect::<Vec<_>>();
        Some(match lang {
            Language::En => format!(
                "Please interpret this reading for {}: {}",
                issue.label(lang),
                names.join(", ")
            ),
            Language::Zh => format!(
                "请为{}解读这些牌：{}",
                issue.label(lang),
                names.join("、")
            ),
        })
    }

    fn expect_stage(&self, stage: ReadingStage) -> Result<()> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(ArcanaError::validation(format!(
                "Reading is at {:?}, not {:?}",
                self.stage, stage
            )))
        }
    }
}
