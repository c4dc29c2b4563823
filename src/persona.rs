// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Threadsmith Developers

//! Authorial personas and the platform rules posts are written against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The hard character limit for a Threads post.
pub const MAX_POST_CHARS: usize = 500;

/// Threads indexes exactly one topic tag per post; extra tags are wasted.
pub const MAX_TOPIC_TAGS: usize = 1;

/// An authorial identity the generator writes as.
///
/// Personas are caller-owned configuration: the generator reads them to
/// shape tone and subject matter, and the scoring engine never touches
/// them at all.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Persona {
    /// Display name, also used to select the persona on the command line.
    pub name: String,

    /// The persona's field (food, business, fitness, ...).
    pub specialty: String,

    /// Register and voice the posts should carry.
    pub tone: String,

    /// What the persona stands for.
    pub values: String,

    /// Who the posts are written for.
    pub target_audience: String,

    /// What the persona is trying to achieve with the account.
    pub goals: String,
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.specialty)
    }
}

/// The built-in example personas shipped with the tool.
///
/// These are starting points; most users will replace them in the
/// settings file.
pub fn defaults() -> Vec<Persona> {
    vec![
        Persona {
            name: String::from("The Foodie"),
            specialty: String::from("Food and dining culture"),
            tone: String::from("Approachable, with an obvious passion for eating well"),
            values: String::from("Good meals make life richer"),
            target_audience: String::from("Food-curious readers in their 20s to 40s"),
            goals: String::from("Share the joy of food and build a community around it"),
        },
        Persona {
            name: String::from("The Operator"),
            specialty: String::from("Business and marketing"),
            tone: String::from("Professional but easy to talk to"),
            values: String::from("Sound knowledge moves people forward"),
            target_audience: String::from("Side-hustlers and founders in their 20s to 50s"),
            goals: String::from("Share practical know-how and earn trust"),
        },
        Persona {
            name: String::from("The Coach"),
            specialty: String::from("Health and fitness"),
            tone: String::from("Upbeat and encouraging"),
            values: String::from("Sustainable habits change lives"),
            target_audience: String::from("Health-minded readers in their 20s to 40s"),
            goals: String::from("Help followers actually improve their health"),
        },
    ]
}

/// The distribution tiers a Threads post climbs after publication.
///
/// The ranking system rolls a post out in four stages, each gated on how
/// the previous one performed. The generator asks the model to predict
/// the stage a draft will reach, and the rubric converts that prediction
/// into the `stage1_potential` sub-score.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// Initial delivery to a slice of followers; judged on early replies.
    Stage1,

    /// Delivery to all followers; judged on sustained engagement.
    #[default]
    Stage2,

    /// Recommendation beyond followers; judged on trend relevance.
    Stage3,

    /// Wide syndication (Instagram and elsewhere); judged on share value.
    Stage4,
}

impl Stage {
    /// What the platform is evaluating at this stage.
    pub fn description(&self) -> &'static str {
        match self {
            Stage::Stage1 => "initial delivery to a slice of followers; early reply velocity",
            Stage::Stage2 => "delivery to all followers; sustained engagement",
            Stage::Stage3 => "discovery beyond followers; trend relevance",
            Stage::Stage4 => "wide syndication outside the platform; share value",
        }
    }

    /// Parses a stage out of loosely formatted model output.
    ///
    /// The model is asked for `Stage1`..`Stage4` but has been seen
    /// answering with things like `"Stage 3"` or `"stage3 (discovery)"`,
    /// so this scans for the first digit in range rather than matching
    /// strictly. Anything unrecognizable falls back to [`Stage::Stage2`],
    /// the most common honest prediction.
    pub fn parse_lenient(input: &str) -> Self {
        for ch in input.chars() {
            match ch {
                '1' => return Stage::Stage1,
                '2' => return Stage::Stage2,
                '3' => return Stage::Stage3,
                '4' => return Stage::Stage4,
                _ => continue,
            }
        }
        Stage::default()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Stage1 => "Stage1",
            Stage::Stage2 => "Stage2",
            Stage::Stage3 => "Stage3",
            Stage::Stage4 => "Stage4",
        };
        f.write_str(s)
    }
}
