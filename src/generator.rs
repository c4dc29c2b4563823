// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Threadsmith Developers

//! Drafts candidate posts with an LLM and scores them.
//!
//! Generation runs in two passes. The draft pass asks for structure: a
//! hook, a useful body, a closing question, one topic tag. The humanize
//! pass rewrites each draft so it reads like a person wrote it, in two
//! registers (calm and warm), and the scored pool is ranked so the best
//! candidates surface first. The drafting pass runs warm and divergent;
//! the humanize pass runs cool and convergent.

use crate::ai::client::claude::{ClaudeRequest, ClaudeResponse, Model};
use crate::ai::client::{APIClient, APIError, APIRequest, APIResponse};
use crate::persona::{MAX_POST_CHARS, Persona, Stage};
use crate::scoring::{self, Metric, MetricScores, Ranked, Rubric, ScoringWeights};
use crate::text;
use indoc::formatdoc;
use log::warn;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

const DRAFT_TEMPERATURE: f64 = 0.7;
const HUMANIZE_TEMPERATURE: f64 = 0.4;
const HUMANIZE_MAX_TOKENS: u32 = 1200;

/// A generation failure.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the AI service.
    #[error("AI service error: {0}")]
    Api(#[from] APIError),

    /// An error scoring a generated candidate.
    #[error("scoring error: {0}")]
    Scoring(#[from] scoring::Error),
}

/// The register the humanize pass rewrites a draft into.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleMode {
    /// Polite and composed; suits know-how and numbers.
    PoliteCalm,

    /// Polite with a little more warmth; closer to the reader.
    PoliteWarm,
}

impl fmt::Display for StyleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StyleMode::PoliteCalm => "polite_calm",
            StyleMode::PoliteWarm => "polite_warm",
        };
        f.write_str(s)
    }
}

/// One candidate post, as the model returns it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DraftPost {
    #[serde(default)]
    post_text: String,

    #[serde(default)]
    topic_tag: Option<String>,

    #[serde(default)]
    hook: String,

    #[serde(default)]
    body: String,

    #[serde(default)]
    cta: String,

    #[serde(default)]
    predicted_stage: String,

    #[serde(default)]
    conversation_trigger: String,

    #[serde(default)]
    reasoning: String,

    #[serde(default)]
    style_mode: Option<StyleMode>,
}

impl DraftPost {
    /// A draft recovered from a response that was not valid JSON.
    ///
    /// The text is capped at the platform limit and patched to end with
    /// a question, since the rest of the pipeline assumes both.
    fn recovered(chunk: &str) -> Self {
        Self {
            post_text: text::ensure_question(chunk, MAX_POST_CHARS),
            topic_tag: Some(String::from("#business")),
            hook: String::new(),
            body: String::new(),
            cta: String::new(),
            predicted_stage: String::from("Stage2"),
            conversation_trigger: String::from("ends with a question"),
            reasoning: String::from("recovered from a non-JSON response"),
            style_mode: None,
        }
    }

    /// The full post body.
    pub fn post_text(&self) -> &str {
        &self.post_text
    }

    /// The post's single topic tag, if the model supplied one.
    pub fn topic_tag(&self) -> Option<&str> {
        self.topic_tag.as_deref()
    }

    /// The opening hook.
    pub fn hook(&self) -> &str {
        &self.hook
    }

    /// The core of the body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The closing call to action.
    pub fn cta(&self) -> &str {
        &self.cta
    }

    /// The distribution stage the model predicted for this post.
    pub fn stage(&self) -> Stage {
        Stage::parse_lenient(&self.predicted_stage)
    }

    /// Why the model thinks readers will reply.
    pub fn conversation_note(&self) -> &str {
        &self.conversation_trigger
    }

    /// The model's one-line rationale for the structure.
    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    /// Which humanize register produced this version, if any.
    pub fn style_mode(&self) -> Option<StyleMode> {
        self.style_mode
    }

    /// The post length in characters, the unit the platform limit uses.
    pub fn char_count(&self) -> usize {
        self.post_text.chars().count()
    }
}

/// A candidate post with its rubric evaluation attached.
#[derive(Debug)]
pub struct ScoredPost {
    draft: DraftPost,
    composite: f64,
    details: MetricScores,
    human_likeness: f64,
}

impl ScoredPost {
    /// The underlying candidate.
    pub fn draft(&self) -> &DraftPost {
        &self.draft
    }

    /// The composite rubric score, in [0, 100].
    pub fn composite(&self) -> f64 {
        self.composite
    }

    /// The raw per-metric sub-scores behind the composite.
    pub fn details(&self) -> &MetricScores {
        &self.details
    }

    /// Advisory only: how human the post reads, in [0, 100]. Not part of
    /// the composite and never used for ranking.
    pub fn human_likeness(&self) -> f64 {
        self.human_likeness
    }
}

#[cfg(test)]
impl ScoredPost {
    /// The first fixture draft, scored with the stock rubric, for
    /// display tests.
    pub(crate) fn test() -> Self {
        let data = crate::test_utils::load_data("claude_drafts");
        let response: ClaudeResponse = serde_json::from_str(&data).unwrap();
        let draft = parse_drafts(&response.text(), 2).remove(0);
        let rubric = Rubric;
        let details = rubric.evaluate(
            draft.post_text(),
            draft.cta(),
            draft.topic_tag(),
            draft.stage(),
        );
        let composite = scoring::composite(&details, &ScoringWeights::default()).unwrap();
        let human_likeness = rubric.human_likeness(draft.post_text(), draft.cta());
        Self {
            draft,
            composite,
            details,
            human_likeness,
        }
    }
}

impl Ranked for ScoredPost {
    fn composite(&self) -> f64 {
        self.composite
    }

    fn conversation_trigger(&self) -> f64 {
        self.details
            .get(Metric::ConversationTrigger)
            .unwrap_or(0.0)
    }
}

/// Generates, humanizes, scores, and ranks candidate posts.
#[derive(Debug)]
pub struct PostGenerator<C> {
    client: C,
    rubric: Rubric,
    weights: ScoringWeights,
    two_pass: bool,
    calm_priority: bool,
}

impl<C> PostGenerator<C>
where
    C: APIClient<APIRequest = ClaudeRequest, APIResponse = ClaudeResponse>,
{
    /// Creates a generator over the given AI client, with the stock
    /// rubric weights and two-pass humanizing enabled.
    pub fn new(client: C) -> Self {
        Self {
            client,
            rubric: Rubric,
            weights: ScoringWeights::default(),
            two_pass: true,
            calm_priority: false,
        }
    }

    /// Overrides the rubric weights.
    pub fn weights(self, weights: ScoringWeights) -> Self {
        Self { weights, ..self }
    }

    /// Prefers the calm register when selecting humanized variants.
    ///
    /// Calm suits know-how and numbers content; warm suits everything
    /// that lives on closeness to the reader.
    pub fn calm_priority(self, calm_priority: bool) -> Self {
        Self {
            calm_priority,
            ..self
        }
    }

    /// Enables or disables the humanize pass.
    pub fn two_pass(self, two_pass: bool) -> Self {
        Self { two_pass, ..self }
    }

    /// Generates `count` scored candidate posts for `persona` from the
    /// given news context, ranked best-first.
    pub async fn generate(
        &self,
        persona: &Persona,
        context: &str,
        count: usize,
    ) -> Result<Vec<ScoredPost>, Error> {
        let prompt = draft_prompt(persona, context, count);
        let request = ClaudeRequest::default()
            .model(Model::cheapest())
            .temperature(DRAFT_TEMPERATURE)
            .input(prompt);
        let response = self.client.send(&request).await?;
        let drafts = parse_drafts(&response.text(), count);

        let posts = if self.two_pass {
            self.humanize_pool(persona, drafts, count).await
        } else {
            drafts
        };

        let mut scored = posts
            .into_iter()
            .map(|post| self.score(post))
            .collect::<Result<Vec<_>, _>>()?;
        scoring::rank(&mut scored);
        scored.truncate(count);
        Ok(scored)
    }

    /// Rewrites each draft in both registers and selects a mixed pool.
    ///
    /// With calm priority on, four calm variants and one warm variant
    /// survive; otherwise two calm and three warm. Calm variants lead in
    /// both arrangements so that equal composites prefer the steadier
    /// rewrite.
    async fn humanize_pool(
        &self,
        persona: &Persona,
        drafts: Vec<DraftPost>,
        count: usize,
    ) -> Vec<DraftPost> {
        let (calm_keep, warm_keep) = if self.calm_priority { (4, 1) } else { (2, 3) };

        let mut pool = Vec::new();
        for draft in drafts.into_iter().take(count) {
            pool.push(self.humanize(persona, &draft, StyleMode::PoliteCalm).await);
            pool.push(self.humanize(persona, &draft, StyleMode::PoliteWarm).await);
        }

        let calm = pool
            .iter()
            .filter(|p| p.style_mode == Some(StyleMode::PoliteCalm))
            .take(calm_keep)
            .cloned();
        let warm = pool
            .iter()
            .filter(|p| p.style_mode == Some(StyleMode::PoliteWarm))
            .take(warm_keep)
            .cloned();
        calm.chain(warm).collect()
    }

    /// Rewrites one draft into the given register.
    ///
    /// Any failure falls back to the original draft (tagged with the
    /// requested register) so a flaky rewrite never loses a candidate.
    async fn humanize(&self, persona: &Persona, draft: &DraftPost, mode: StyleMode) -> DraftPost {
        let fallback = || {
            let mut post = draft.clone();
            post.style_mode = Some(mode);
            post
        };

        let prompt = humanize_prompt(persona, draft, mode);
        let request = ClaudeRequest::default()
            .model(Model::cheapest())
            .max_tokens(HUMANIZE_MAX_TOKENS)
            .temperature(HUMANIZE_TEMPERATURE)
            .input(prompt);

        let response = match self.client.send(&request).await {
            Ok(response) => response,
            Err(err) => {
                warn!("humanize pass failed, keeping the draft: {err}");
                return fallback();
            }
        };

        let Some(mut rewritten) = parse_single(&response.text()) else {
            return fallback();
        };

        // The rewrite is not allowed to change the topic tag.
        if draft.topic_tag.is_some() && rewritten.topic_tag != draft.topic_tag {
            rewritten.topic_tag = draft.topic_tag.clone();
        }

        if rewritten.post_text.trim().is_empty() {
            return fallback();
        }

        rewritten.post_text = text::ensure_question(&rewritten.post_text, MAX_POST_CHARS);
        rewritten.style_mode = Some(mode);
        rewritten
    }

    fn score(&self, draft: DraftPost) -> Result<ScoredPost, scoring::Error> {
        let details = self.rubric.evaluate(
            draft.post_text(),
            draft.cta(),
            draft.topic_tag(),
            draft.stage(),
        );
        let composite = scoring::composite(&details, &self.weights)?;
        let human_likeness = self.rubric.human_likeness(draft.post_text(), draft.cta());
        Ok(ScoredPost {
            draft,
            composite,
            details,
            human_likeness,
        })
    }
}

/// The drafting prompt: structure and talking points, persona voice, and
/// a strict JSON-only output contract.
fn draft_prompt(persona: &Persona, context: &str, count: usize) -> String {
    formatdoc! {r##"
        <role>
        You are a professional social copywriter who understands the current
        Threads ranking algorithm.
        </role>

        <persona>
        Name: {name}
        Specialty: {specialty}
        Tone: {tone}
        Values: {values}
        Audience: {audience}
        Goals: {goals}
        </persona>

        <rules>
        1. Replies (conversation) count for more than likes.
        2. Keep posts text-first so the ranking system can read them.
        3. Use exactly one topic tag.
        4. Stay under {max_chars} characters and leave room for pushback; do not
           tie off every loose end.
        5. End every post with a question, ideally one answerable with a number.
        </rules>

        <structure>
        1. Hook (1-2 lines): stop the scroll.
        2. Body (3-8 lines): empathy or genuinely useful information.
        3. Closer (1-2 lines): a question that invites replies.
        </structure>

        <context>
        {context}
        </context>

        <task>
        Writing as {name}, produce {count} candidate posts from the material
        above.
        </task>

        <constraints>
        - Each post stays under {max_chars} characters.
        - Keep the persona's tone throughout.
        - End each post with a question (numbered answers encouraged).
        - Exactly one topic tag per post.
        - Predict the distribution stage (Stage1-Stage4) each post will reach.
        </constraints>

        <output_rules>
        - Output JSON only.
        - No prose, headings, annotations, code fences, bullet lists, or
          preamble of any kind.
        - The first character must be '[' and the last character must be ']'.
        </output_rules>

        <output_format>
        [
          {{
            "post_text": "the full post, under {max_chars} characters",
            "topic_tag": "#topic",
            "hook": "the opening hook",
            "body": "the core of the body",
            "cta": "the closing question",
            "predicted_stage": "Stage1-4",
            "conversation_trigger": "why readers will reply",
            "reasoning": "why this structure (under 100 characters)"
          }}
        ]
        </output_format>"##,
        name = persona.name,
        specialty = persona.specialty,
        tone = persona.tone,
        values = persona.values,
        audience = persona.target_audience,
        goals = persona.goals,
        context = context,
        count = count,
        max_chars = MAX_POST_CHARS,
    }
}

/// The humanize prompt: keep the argument, raise the warmth.
fn humanize_prompt(persona: &Persona, draft: &DraftPost, mode: StyleMode) -> String {
    let draft_text = draft.post_text().trim();
    let topic_tag = draft.topic_tag().unwrap_or("#business");
    let predicted_stage = draft.stage();

    let (mode_label, vocab_hint, warmth_hint) = match mode {
        StyleMode::PoliteCalm => (
            "polite_calm (composed, conversational; suits know-how and numbers)",
            "Choose composed wording (\"a question I hear a lot\", \"in the field\", \"here is the crux\"). Nothing slangy.",
            "To keep it from stiffening, allow exactly one conversational aside.",
        ),
        StyleMode::PoliteWarm => (
            "polite_warm (polite but closer to the reader)",
            "Allow slightly closer phrasing (\"this comes up constantly\", \"this one slips past people\"). Nothing flippant.",
            "Stay polite, but turn the temperature up a notch.",
        ),
    };

    formatdoc! {r#"
        <role>
        You edit Threads posts so they read professional but conversational:
        polite, and closed with a question that pulls readers in.
        </role>

        <persona>
        Name: {name}
        Specialty: {specialty}
        Tone: {tone}
        Values: {values}
        Audience: {audience}
        Goals: {goals}
        </persona>

        <style_mode>
        {mode_label}
        </style_mode>

        <input>
        Below is a draft. Keep its substance (claims, examples, line of
        argument) and raise only how human it sounds.
        Draft:
        {draft_text}
        </input>

        <human_style_spec>
        - Stay polite, with conversational temperature; never stiff.
        - {vocab_hint}
        - {warmth_hint}
        - Include exactly one first-hand note ("from the field" or a small
          personal moment), no more.
        - Do not over-polish: leave something for readers to push back on.
        - Hedge at most once; do not hedge everything, do not assert everything.
        - No "Hook:", "Body:", "CTA:" or other scaffolding labels in the text.
        - Avoid stock AI phrasing ("in conclusion", "it's important to note",
          "in essence", "comprehensive").
        - Close with a question. Not yes/no: offer choices or invite a
          specific memory ("where did it break down for you?").
        - Stay under {max_chars} characters.
        - Keep the topic tag exactly as it is.
        </human_style_spec>

        <output_rules>
        - Output JSON only (no prose).
        - The first character must be '{{' and the last character must be '}}'.
        </output_rules>

        <output_format>
        {{
          "post_text": "the improved post, under {max_chars} characters",
          "topic_tag": "{topic_tag}",
          "hook": "gist of the hook in the text (short)",
          "body": "gist of the core (short)",
          "cta": "the closing question (short)",
          "predicted_stage": "{predicted_stage}",
          "conversation_trigger": "why readers will want to answer (short)",
          "reasoning": "what the rewrite changed (under 100 characters)",
          "style_mode": "{mode}"
        }}
        </output_format>"#,
        name = persona.name,
        specialty = persona.specialty,
        tone = persona.tone,
        values = persona.values,
        audience = persona.target_audience,
        goals = persona.goals,
        mode_label = mode_label,
        draft_text = draft_text,
        vocab_hint = vocab_hint,
        warmth_hint = warmth_hint,
        topic_tag = topic_tag,
        predicted_stage = predicted_stage,
        mode = mode,
        max_chars = MAX_POST_CHARS,
    }
}

/// Parses the drafting response: a strict JSON array first, then a fenced
/// block, then a lenient plain-text recovery.
fn parse_drafts(response_text: &str, expected: usize) -> Vec<DraftPost> {
    let response_text = response_text.trim();

    let array_re = Regex::new(r"(?s)\[\s*\{.*\}\s*\]").unwrap();
    if let Some(found) = array_re.find(response_text) {
        if let Ok(posts) = serde_json::from_str::<Vec<DraftPost>>(found.as_str()) {
            if !posts.is_empty() {
                return posts;
            }
        }
    }

    let fence_re = Regex::new(r"(?s)```json\s*(.*?)\s*```").unwrap();
    if let Some(caps) = fence_re.captures(response_text) {
        let fenced = &caps[1];
        if let Ok(posts) = serde_json::from_str::<Vec<DraftPost>>(fenced) {
            if !posts.is_empty() {
                return posts;
            }
        }
        if let Ok(post) = serde_json::from_str::<DraftPost>(fenced) {
            return vec![post];
        }
    }

    fallback_parse(response_text, expected)
}

/// Recovers drafts from a response that refused to be JSON.
///
/// Splits on "Post N"-style headers if the model wrote any, otherwise on
/// blank lines, and caps the result at the expected count.
fn fallback_parse(response_text: &str, expected: usize) -> Vec<DraftPost> {
    let raw = response_text.trim();
    if raw.is_empty() {
        return vec![DraftPost::recovered("")];
    }

    let header_re = Regex::new(r"(?im)(?:【\s*投稿\s*\d+\s*】|^post\s*\d+\s*[:：]?)").unwrap();
    let mut parts: Vec<String> = header_re
        .split(raw)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect();

    if parts.len() < 2 {
        parts = raw
            .split("\n\n")
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect();
    }

    parts.truncate(expected);
    if parts.is_empty() {
        parts.push(raw.to_string());
    }
    parts
        .iter()
        .map(|chunk| DraftPost::recovered(chunk))
        .collect()
}

/// Extracts the single JSON object a humanize response should contain.
fn parse_single(response_text: &str) -> Option<DraftPost> {
    let object_re = Regex::new(r#"(?s)\{\s*".*"\s*\}"#).unwrap();
    let found = object_re.find(response_text.trim())?;
    serde_json::from_str::<DraftPost>(found.as_str()).ok()
}
