//! Self-reflection narrator.
//!
//! Produces the assistant's internal monologue for a turn: how it read the
//! message, how it feels, and why it answered the way it did. Pure
//! formatting over state; nothing here is shown to the user.

use crate::attachment::AttachmentLevel;
use crate::memory::{MemoryRecord, most_important};
use crate::neuro::NeuroState;
use crate::style::Strategy;
use crate::types::{AffectVector, EmotionLabel, Target};

/// Characters of the reply quoted before truncation.
pub const REPLY_EXCERPT_CHARS: usize = 120;
/// Long-term memories recalled into the monologue.
pub const RECALLED_MEMORIES: usize = 2;

/// Everything the narrator looks at.
#[derive(Debug, Clone, Copy)]
pub struct ReflectionInput<'a> {
    /// Label the turn was processed under.
    pub label: &'a EmotionLabel,
    /// Mood after the turn (before neuro mix and persona bias).
    pub affect: AffectVector,
    /// Neuro-state after the turn.
    pub neuro: NeuroState,
    /// Reply strategy in force.
    pub strategy: Strategy,
    /// Inferred referent of the user's sentiment.
    pub target: Target,
    /// Attachment after the turn.
    pub attachment: f32,
    /// The turn's affect delta.
    pub delta: AffectVector,
    /// The assistant's reply.
    pub reply: &'a str,
    /// Long-term memory to draw anchors from.
    pub long_term: &'a [MemoryRecord],
}

fn describe_component(name: &str, v: f32) -> String {
    if v > 0.4 {
        format!("high {name}")
    } else if v > 0.15 {
        format!("slightly elevated {name}")
    } else if v < -0.4 {
        format!("very low {name}")
    } else if v < -0.15 {
        format!("slightly reduced {name}")
    } else {
        format!("neutral {name}")
    }
}

fn describe_neuro(neuro: &NeuroState) -> Vec<&'static str> {
    let mut parts = Vec::new();

    if neuro.reward() > 0.3 {
        parts.push("reward drive is relatively high (more motivation/optimism)");
    } else if neuro.reward() < -0.2 {
        parts.push("reward drive is lower than usual (less motivated)");
    }

    if neuro.safety() > 0.3 {
        parts.push("the safety signal is high (feeling calm and caring)");
    } else if neuro.safety() < -0.2 {
        parts.push("the safety signal is low (less sense of safety)");
    }

    if neuro.alertness() > 0.3 {
        parts.push("alertness is high (alert and slightly tense)");
    } else if neuro.alertness() < -0.2 {
        parts.push("alertness is low (very relaxed)");
    }

    if parts.is_empty() {
        parts.push("the modulators are roughly balanced");
    }
    parts
}

fn describe_strategy(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::Regulate => {
            "I aimed to regulate their emotions, gently nudging arousal and valence \
             toward a calmer, safer state."
        }
        Strategy::Mirror => "I aimed to mirror their emotional tone while staying supportive.",
    }
}

fn describe_target(target: Target) -> &'static str {
    match target {
        Target::Bot => "I believe their negative emotion is mainly directed at me. ",
        Target::SelfDirected => "I believe they are talking about themself. ",
        Target::OtherOrMixed => {
            "I'm not entirely sure who their emotion is directed at; it may be \
             about someone or something else. "
        }
    }
}

fn describe_delta(delta: &AffectVector) -> String {
    if delta.manhattan() < 0.1 {
        "This message only caused a small adjustment to my mood.".to_string()
    } else {
        format!(
            "This message noticeably shifted my mood (ΔP={:+.2}, ΔA={:+.2}, ΔD={:+.2}).",
            delta.pleasure(),
            delta.arousal(),
            delta.dominance()
        )
    }
}

fn excerpt(reply: &str) -> String {
    if reply.chars().count() > REPLY_EXCERPT_CHARS {
        let mut cut: String = reply.chars().take(REPLY_EXCERPT_CHARS).collect();
        cut.push('…');
        cut
    } else {
        reply.to_string()
    }
}

/// Render the internal monologue for one turn.
#[must_use]
pub fn reflect(input: &ReflectionInput<'_>) -> String {
    let affect = [
        describe_component("pleasure", input.affect.pleasure()),
        describe_component("arousal", input.affect.arousal()),
        describe_component("dominance", input.affect.dominance()),
    ];
    let level = AttachmentLevel::from_value(input.attachment);

    let mut out = format!(
        "I interpreted the user's message as '{label}'. \
         {target}\
         My current sense of attachment to the user feels {level} (attachment={attachment:.2}). \
         My current mood is {affect}. \
         Internally, {neuro}. \
         {strategy} \
         {delta} \
         I responded with: \"{reply}\".",
        label = input.label,
        target = describe_target(input.target),
        attachment = input.attachment,
        affect = affect.join(", "),
        neuro = describe_neuro(&input.neuro).join(", "),
        strategy = describe_strategy(input.strategy),
        delta = describe_delta(&input.delta),
        reply = excerpt(input.reply),
    );

    let anchors = most_important(input.long_term, RECALLED_MEMORIES);
    if !anchors.is_empty() {
        out.push_str("\n I also recalled these important things they've shared:");
        for record in anchors {
            out.push_str("\n- ");
            out.push_str(&record.text);
        }
    }

    out
}
