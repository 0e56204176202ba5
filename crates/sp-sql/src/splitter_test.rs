use super::*;

fn split(script: &str) -> Vec<Statement> {
    split_statements(script, &SplitOptions::default()).collect()
}

fn texts(script: &str) -> Vec<String> {
    split(script).into_iter().map(|s| s.text).collect()
}

#[test]
fn test_simple_statements() {
    let stmts = split("CREATE TABLE a (id INT);\nINSERT INTO a VALUES (1);\n");
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[0].text, "CREATE TABLE a (id INT)");
    assert_eq!(stmts[0].source_line, 1);
    assert_eq!(stmts[1].text, "INSERT INTO a VALUES (1)");
    assert_eq!(stmts[1].source_line, 2);
}

#[test]
fn test_multi_line_statement() {
    let stmts = split("\n\nALTER TABLE users\n  ADD COLUMN age INT,\n  ADD COLUMN city VARCHAR;\n");
    assert_eq!(stmts.len(), 1);
    assert_eq!(
        stmts[0].text,
        "ALTER TABLE users\n  ADD COLUMN age INT,\n  ADD COLUMN city VARCHAR"
    );
    assert_eq!(stmts[0].source_line, 3);
}

#[test]
fn test_procedure_block_is_one_statement() {
    let stmts = split("DELIMITER $$\nCREATE PROCEDURE p() BEGIN SELECT 1; END$$\nDELIMITER ;\n");
    assert_eq!(stmts.len(), 1);
    assert!(stmts[0].text.contains("BEGIN SELECT 1; END"));
    assert!(!stmts[0].text.contains("$$"));
    assert!(!stmts[0].text.contains("DELIMITER"));
    assert_eq!(stmts[0].source_line, 2);
}

#[test]
fn test_multi_line_procedure_between_plain_statements() {
    let script = "\
ALTER TABLE releases ADD COLUMN x INT;
DELIMITER $$
CREATE TRIGGER check_insert BEFORE INSERT ON releases FOR EACH ROW
BEGIN
  SET NEW.x = 1;
  SET NEW.y = 2;
END;$$
CREATE PROCEDURE noop() BEGIN END $$
DELIMITER ;
UPDATE settings SET value = '5' WHERE setting = 'sqlpatch';
";
    let stmts = texts(script);
    assert_eq!(stmts.len(), 4);
    assert_eq!(stmts[0], "ALTER TABLE releases ADD COLUMN x INT");
    assert_eq!(
        stmts[1],
        "CREATE TRIGGER check_insert BEFORE INSERT ON releases FOR EACH ROW\nBEGIN\n  SET NEW.x = 1;\n  SET NEW.y = 2;\nEND"
    );
    assert_eq!(stmts[2], "CREATE PROCEDURE noop() BEGIN END");
    assert_eq!(
        stmts[3],
        "UPDATE settings SET value = '5' WHERE setting = 'sqlpatch'"
    );
}

#[test]
fn test_comments_never_reach_statements() {
    let script = "\
-- note
# note
// note
CREATE TABLE a (
  -- inline note
  id INT
);
   -- indented note
INSERT INTO a VALUES (1);
";
    for text in texts(script) {
        assert!(!text.contains("note"), "comment leaked into: {text}");
    }
    assert_eq!(texts(script).len(), 2);
}

#[test]
fn test_unterminated_trailing_content_is_dropped() {
    let mut stmts = split_statements("SELECT 1;\nSELECT 2", &SplitOptions::default());
    assert_eq!(stmts.next().unwrap().text, "SELECT 1");
    assert!(stmts.next().is_none());
    assert_eq!(stmts.remainder().as_deref(), Some("SELECT 2"));
}

#[test]
fn test_unterminated_custom_block_is_dropped() {
    let script = "DELIMITER $$\nCREATE PROCEDURE p() BEGIN SELECT 1; END\n";
    let mut stmts = split_statements(script, &SplitOptions::default());
    assert!(stmts.next().is_none());
    assert!(stmts.remainder().unwrap().contains("CREATE PROCEDURE"));
    assert_eq!(stmts.delimiter_state().active(), "$$");
}

#[test]
fn test_no_remainder_for_complete_script() {
    let mut stmts = split_statements("SELECT 1;\n\n  \n", &SplitOptions::default());
    assert!(stmts.next().is_some());
    assert!(stmts.next().is_none());
    assert_eq!(stmts.remainder(), None);
}

#[test]
fn test_splitting_is_restartable() {
    let script = "DELIMITER $$\nSELECT 1$$\nSELECT 2$$\n";
    let first: Vec<Statement> = split(script);
    let second: Vec<Statement> = split(script);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_state_does_not_leak_between_scripts() {
    // The first script leaves `$$` active; the second must start from `;`.
    let _ = split("DELIMITER $$\nSELECT 1$$\n");
    assert_eq!(texts("SELECT 2;\n"), vec!["SELECT 2"]);
}

#[test]
fn test_bare_custom_terminator_line() {
    let script = "DELIMITER //\nCREATE PROCEDURE p()\nBEGIN\n  SELECT 1;\nEND\n//\nDELIMITER ;\n";
    let stmts = texts(script);
    assert_eq!(stmts, vec!["CREATE PROCEDURE p()\nBEGIN\n  SELECT 1;\nEND"]);
}

#[test]
fn test_crlf_line_endings() {
    let stmts = texts("SELECT 1;\r\nSELECT 2;\r\n");
    assert_eq!(stmts, vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn test_placeholders_substituted() {
    let options = SplitOptions {
        placeholders: Placeholders {
            local: Some("LOCAL ".to_string()),
            data: Some("/srv/data/".to_string()),
        },
        ..SplitOptions::default()
    };
    let script = "LOAD DATA {:local:}INFILE '{:data:}10-groups.tsv' INTO TABLE groups;\n";
    let stmts: Vec<Statement> = split_statements(script, &options).collect();
    assert_eq!(
        stmts[0].text,
        "LOAD DATA LOCAL INFILE '/srv/data/10-groups.tsv' INTO TABLE groups"
    );
}

#[test]
fn test_placeholders_left_alone_when_unset() {
    let options = SplitOptions {
        placeholders: Placeholders {
            local: Some(String::new()),
            data: Some(String::new()),
        },
        ..SplitOptions::default()
    };
    let script = "LOAD DATA {:local:}INFILE '{:data:}x.tsv' INTO TABLE t;\n";
    let stmts: Vec<Statement> = split_statements(script, &options).collect();
    assert_eq!(stmts[0].text, "LOAD DATA INFILE '{:data:}x.tsv' INTO TABLE t");

    let stmts = texts(script);
    assert_eq!(stmts[0], "LOAD DATA {:local:}INFILE '{:data:}x.tsv' INTO TABLE t");
}

#[test]
fn test_redundant_return_to_default_is_not_a_statement() {
    assert!(texts("DELIMITER ;\n").is_empty());
}
