use jira_org::{jira_to_org, org_to_jira, org_to_jira_with, ConvertOptions, HeadingPolicy};

#[test]
fn jira_list_with_nested_bullets() {
    let input = "# Item 1\n# Item 2\n# Item 3 with sub-items:\n#* Sub-item A\n#* Sub-item B\n# Item 4\n";
    let expected = "1. Item 1\n2. Item 2\n3. Item 3 with sub-items:\n  - Sub-item A\n  - Sub-item B\n4. Item 4\n";
    assert_eq!(jira_to_org(input).text, expected);
}

#[test]
fn org_nested_numbered_list() {
    assert_eq!(
        org_to_jira("1. First\n  1. Sub first\n  2. Sub second"),
        "# First\n## Sub first\n## Sub second"
    );
}

#[test]
fn org_links() {
    assert_eq!(
        org_to_jira("[[https://example.com][Example]]"),
        "[Example|https://example.com]"
    );
    assert_eq!(org_to_jira("[[https://example.com]]"), "[https://example.com]");
}

#[test]
fn bold_is_a_fixed_point_both_ways() {
    let org = jira_to_org("*bold*").text;
    assert_eq!(org, "*bold*");
    assert_eq!(org_to_jira(&org), "*bold*");
}

#[test]
fn inline_styles_round_trip() {
    let jira = "*b* _i_ +u+ -s- {{c}}";
    let org = jira_to_org(jira).text;
    assert_eq!(org, "*b* /i/ _u_ +s+ ~c~");
    assert_eq!(org_to_jira(&org), jira);
}

#[test]
fn bullet_depth_is_two_spaces_per_level() {
    for depth in 1..=6 {
        let input = format!("{} item", "*".repeat(depth));
        let expected = format!("{}- item", " ".repeat((depth - 1) * 2));
        assert_eq!(jira_to_org(&input).text, expected);
    }
}

#[test]
fn jira_sub_sub_item_never_becomes_a_heading() {
    let conversion = jira_to_org("* Item\n** Sub-item\n*** Sub-sub-item");
    assert_eq!(conversion.text.lines().last(), Some("    - Sub-sub-item"));
    assert!(!conversion.text.contains("***"));
    assert!(conversion.headings.is_empty());
    assert!(!conversion.render_headings(2).contains("***"));
}

#[test]
fn new_top_level_list_restarts_numbering() {
    let after_blank = jira_to_org("# a\n# b\n# c\n\n# again").text;
    assert_eq!(after_blank.lines().last(), Some("1. again"));

    let after_text = jira_to_org("# a\n# b\nBreak\n# again").text;
    assert_eq!(after_text.lines().last(), Some("1. again"));
}

#[test]
fn fenced_bodies_pass_through_both_ways() {
    let org = jira_to_org("{code}\n* not a bullet *\n{code}").text;
    assert_eq!(org, "#+begin_src\n* not a bullet *\n#+end_src");
    assert_eq!(org_to_jira(&org), "{code}\n* not a bullet *\n{code}");

    let org = jira_to_org("{noformat}\n# _raw_ -text-\n{noformat}").text;
    assert_eq!(org, "#+begin_example\n# _raw_ -text-\n#+end_example");
    assert_eq!(org_to_jira(&org), "{noformat}\n# _raw_ -text-\n{noformat}");
}

#[test]
fn headings_round_trip_through_base_level_two() {
    let conversion = jira_to_org("h1. Summary\nh2. Details");
    let org = conversion.render_headings(2);
    assert_eq!(org, "*** Summary\n**** Details");
    assert_eq!(org_to_jira(&org), "h1. Summary\nh2. Details");
}

#[test]
fn heading_policy_is_applied_consistently() {
    let deep = "********** Ten";
    assert_eq!(org_to_jira(deep), "h6. Ten");
    let passthrough = ConvertOptions {
        heading_policy: HeadingPolicy::Passthrough,
    };
    assert_eq!(org_to_jira_with(deep, &passthrough).text, deep);
}

#[test]
fn mixed_document() {
    let jira = "h2. Plan\nSteps for _now_:\n# Build {{cache}}\n#* see [Docs|https://x.io/a_b]\n# Test\n----\n{code:rust}\nfn main() {}\n{code}\n";
    let conversion = jira_to_org(jira);
    assert_eq!(
        conversion.render_headings(1),
        "*** Plan\nSteps for /now/:\n1. Build ~cache~\n  - see [Docs|https://x.io/a_b]\n2. Test\n-----\n#+begin_src rust\nfn main() {}\n#+end_src\n"
    );
    assert_eq!(conversion.stats.headings, 1);
    assert_eq!(conversion.stats.list_items, 3);
    assert_eq!(conversion.stats.blocks, 1);
    assert!(conversion.diagnostics.is_empty());
}
