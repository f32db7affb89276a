use taskboard::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("taskboard init: initialized");
    human.push_summary("dir", "/tmp/board");
    human.push_detail("created .taskboard.toml");
    human.push_warning("ignoring invalid config");
    human.push_next_step("taskboard board");

    let rendered = format_human(&human);
    assert!(rendered.contains("taskboard init: initialized"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- dir: /tmp/board"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- created .taskboard.toml"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- ignoring invalid config"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- taskboard board"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("taskboard init: nothing to do");
    let rendered = format_human(&human);
    assert_eq!(rendered, "taskboard init: nothing to do");
}
