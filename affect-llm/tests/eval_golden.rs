//! Reply prompt golden tests.
//!
//! Each case fills the reply template for a representative assistant state
//! and checks that the rendered system prompt carries the numbers and
//! guidance the backend needs, with no placeholder left behind.
//!
//! Run with `cargo test -p affect-llm --test eval_golden`.

use affect_llm::prompt::{self, PromptTemplate, REPLY_VARS};

/// A golden test case for prompt rendering.
struct GoldenCase {
    /// Human-readable name for the test case.
    name: &'static str,
    /// Template variables to fill in.
    vars: Vec<(&'static str, &'static str)>,
    /// Strings that MUST appear in the rendered prompt.
    prompt_must_contain: Vec<&'static str>,
    /// Strings that MUST NOT appear in the rendered prompt.
    prompt_must_not_contain: Vec<&'static str>,
}

fn vars_with(overrides: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
    let mut vars = vec![
        ("pleasure", "0.00"),
        ("arousal", "0.00"),
        ("dominance", "0.00"),
        ("warmth", "0.50"),
        ("formality", "0.50"),
        ("hedging", "0.50"),
        ("emoji", "0.30"),
        ("pace", "0.50"),
        ("strategy", "regulate"),
        (
            "strategy_guidance",
            "mirror=reflect the user's tone; regulate=gently lower arousal / increase clarity and agency",
        ),
        ("valence_bias", "0.20"),
        ("arousal_bias", "-0.20"),
        ("dominance_bias", "0.10"),
        ("persona_weight", "0.50"),
        ("directness", "0.50"),
        ("persona_formality", "0.70"),
        ("persona_emoji", "0.20"),
    ];
    for (key, value) in overrides {
        if let Some(slot) = vars.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value;
        }
    }
    vars
}

fn golden_cases() -> Vec<GoldenCase> {
    vec![
        // ---------------------------------------------------------------
        // 1. Calm therapist, neutral turn
        // ---------------------------------------------------------------
        GoldenCase {
            name: "calm_therapist_neutral",
            vars: vars_with(&[]),
            prompt_must_contain: vec![
                "pleasure=0.00, arousal=0.00, dominance=0.00",
                "Strategy: regulate",
                "valence_bias=0.20, arousal_bias=-0.20, dominance_bias=0.10, weight=0.50",
                "formality=0.70",
            ],
            prompt_must_not_contain: vec!["{pleasure}", "{persona_emoji}", "TODO"],
        },
        // ---------------------------------------------------------------
        // 2. Supportive friend mirroring a happy user
        // ---------------------------------------------------------------
        GoldenCase {
            name: "supportive_friend_mirroring_joy",
            vars: vars_with(&[
                ("pleasure", "0.45"),
                ("arousal", "0.12"),
                ("emoji", "0.70"),
                ("strategy", "mirror"),
                ("valence_bias", "0.30"),
                ("arousal_bias", "0.10"),
                ("dominance_bias", "0.00"),
                ("persona_emoji", "0.70"),
            ]),
            prompt_must_contain: vec![
                "pleasure=0.45",
                "emoji=0.70",
                "Strategy: mirror",
                "at most ONE light emoji",
            ],
            prompt_must_not_contain: vec!["{strategy}", "{emoji}"],
        },
        // ---------------------------------------------------------------
        // 3. Anger directed at the assistant: low hedging, low emoji
        // ---------------------------------------------------------------
        GoldenCase {
            name: "anger_at_bot_damped_style",
            vars: vars_with(&[
                ("pleasure", "-0.30"),
                ("arousal", "0.35"),
                ("hedging", "0.30"),
                ("emoji", "0.00"),
                ("directness", "0.70"),
            ]),
            prompt_must_contain: vec![
                "pleasure=-0.30",
                "hedging=0.30",
                "emoji=0.00",
                "directness=0.70 (1=very direct, 0=very hedged)",
            ],
            prompt_must_not_contain: vec!["{hedging}", "{directness}"],
        },
    ]
}

#[test]
fn golden_prompts_render_completely() {
    let template = PromptTemplate::builtin();
    for case in golden_cases() {
        let rendered = template.render(&case.vars);
        for needle in &case.prompt_must_contain {
            assert!(
                rendered.contains(needle),
                "[{}] missing {needle:?} in:\n{rendered}",
                case.name
            );
        }
        for needle in &case.prompt_must_not_contain {
            assert!(
                !rendered.contains(needle),
                "[{}] unexpected {needle:?} in:\n{rendered}",
                case.name
            );
        }
        for key in REPLY_VARS {
            assert!(
                !rendered.contains(&format!("{{{key}}}")),
                "[{}] placeholder {key} left unrendered",
                case.name
            );
        }
    }
}

#[test]
fn golden_prompt_keeps_guidance_block() {
    let rendered = PromptTemplate::builtin().render(&vars_with(&[]));
    assert!(rendered.starts_with("You are an empathetic"));
    assert!(rendered.contains("Communication guidance:"));
    assert!(rendered.contains("Honor persona settings when wording the reply."));
}

#[test]
fn golden_completion_prompt_wraps_memory_context() {
    let user = prompt::with_memory_context(
        "Important things the user has shared before:\n- They are starting a new job",
        "I'm nervous about Monday.",
    );
    let full = prompt::ollama_prompt("SYS", &user);
    assert_eq!(
        full,
        "SYS\n\nUser: Important things the user has shared before:\n- They are starting a new job\n\nCurrent message from the user:\nI'm nervous about Monday.\nAssistant:"
    );
}

#[test]
fn golden_fallback_mentions_error() {
    let reply = prompt::fallback_reply(&"connection refused");
    assert_eq!(
        reply,
        "(Fallback) I'm having trouble reaching the language model: connection refused"
    );
}

#[test]
fn template_file_overrides_builtin() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("prompt.toml");
    std::fs::write(
        &path,
        "[prompt]\nsystem = \"Mood {pleasure}/{arousal}/{dominance}. Strategy {strategy}.\"\n",
    )
    .expect("write");
    let template = PromptTemplate::from_file(&path).expect("load");
    let rendered = template.render(&vars_with(&[("strategy", "mirror")]));
    assert_eq!(rendered, "Mood 0.00/0.00/0.00. Strategy mirror.");
}
