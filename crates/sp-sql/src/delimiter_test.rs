use super::*;

#[test]
fn test_classify_comments() {
    assert_eq!(classify_line("-- note"), LineKind::Comment("note"));
    assert_eq!(classify_line("  # note  "), LineKind::Comment("note"));
    assert_eq!(classify_line("// note"), LineKind::Comment("note"));
    assert_eq!(classify_line("--"), LineKind::Comment(""));
}

#[test]
fn test_classify_directive() {
    assert_eq!(classify_line("DELIMITER $$"), LineKind::Directive("$$"));
    assert_eq!(classify_line("  delimiter ;  "), LineKind::Directive(";"));
    assert_eq!(classify_line("DELIMITER //"), LineKind::Directive("//"));
}

#[test]
fn test_classify_sql() {
    let line = "ALTER TABLE users ADD COLUMN age INT;";
    assert_eq!(classify_line(line), LineKind::Sql(line));
    // "DELIMITER" without a token is ordinary text
    assert_eq!(classify_line("DELIMITER"), LineKind::Sql("DELIMITER"));
}

#[test]
fn test_new_state_uses_default() {
    let state = DelimiterState::default();
    assert_eq!(state.active(), ";");
    assert_eq!(state.default_delimiter(), ";");
    assert!(!state.is_custom());
}

#[test]
fn test_switch_and_back() {
    let mut state = DelimiterState::default();
    state.switch("$$");
    assert!(state.is_custom());
    assert_eq!(state.active(), "$$");
    state.switch(";");
    assert!(!state.is_custom());
}

#[test]
fn test_terminates_ignores_trailing_whitespace_and_case() {
    let mut state = DelimiterState::default();
    assert!(state.terminates("SELECT 1;   "));
    assert!(!state.terminates("SELECT 1"));

    state.switch("GO");
    assert!(state.terminates("SELECT 1 go"));
    assert!(!state.terminates("SELECT 1;"));
}

#[test]
fn test_normalize_replaces_custom_token() {
    let mut state = DelimiterState::default();
    state.switch("$$");
    assert_eq!(state.normalize("END$$"), "END;");
    assert_eq!(state.normalize("END $$  "), "END;");
}

#[test]
fn test_normalize_strips_default_before_custom() {
    let mut state = DelimiterState::default();
    state.switch("$$");
    assert_eq!(state.normalize("END;$$"), "END;");
    assert_eq!(state.normalize("END; $$"), "END;");
}

#[test]
fn test_normalize_leaves_other_lines() {
    let mut state = DelimiterState::default();
    assert_eq!(state.normalize("SELECT 1;"), "SELECT 1;");

    state.switch("$$");
    assert_eq!(state.normalize("  SELECT 1;"), "  SELECT 1;");
}

#[test]
fn test_normalize_bare_custom_token() {
    let mut state = DelimiterState::default();
    state.switch("$$");
    assert_eq!(state.normalize("$$"), ";");
}

#[test]
fn test_strip_default() {
    let state = DelimiterState::default();
    assert_eq!(state.strip_default("SELECT 1;"), "SELECT 1");
    assert_eq!(state.strip_default("SELECT 1 ;\n"), "SELECT 1");
    assert_eq!(state.strip_default("SELECT 1"), "SELECT 1");
    assert_eq!(state.strip_default("SELECT ';';;"), "SELECT ';';");
}
