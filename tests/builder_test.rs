//! Tests for parsing documents into trees

use rstest::rstest;

use kvtree::domain::{parse, DomainError, KvTree, TreeBuilder};
use kvtree::util::testing;

const NESTED: &str = r#"
"GameInfo"
{
    "game"    "Half-Life 2"
    "Tools"
    {
        "platform" "Windows"
    }
}
"#;

fn fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/resources/{name}")).expect("fixture readable")
}

// ============================================================
// Structure
// ============================================================

#[test]
fn given_nested_example_when_parsing_then_builds_expected_tree() {
    testing::init_test_setup();
    let tree = TreeBuilder::parse_str(NESTED).unwrap();
    let root = tree.root();

    let root_branch = tree.get(root).unwrap();
    assert!(root_branch.is_file());
    assert_eq!(root_branch.children().len(), 1);

    let game_info = tree.branch(root, "GameInfo").unwrap();
    let leaves = tree.get(game_info).unwrap().leaves();
    assert_eq!(leaves.len(), 1);
    assert_eq!((leaves[0].key.as_str(), leaves[0].value.as_str()), ("game", "Half-Life 2"));

    let tools = tree.branch(game_info, "Tools").unwrap();
    let tool_leaves = tree.get(tools).unwrap().leaves();
    assert_eq!(tool_leaves.len(), 1);
    assert_eq!(tool_leaves[0].value, "Windows");
    assert!(tree.get(tools).unwrap().children().is_empty());
}

#[test]
fn given_gameinfo_fixture_when_parsing_then_keeps_duplicate_keys_in_order() {
    let tree = TreeBuilder::parse_str(&fixture("gameinfo.txt")).unwrap();
    let search_paths = tree
        .branch_path(tree.root(), &["GameInfo", "FileSystem", "SearchPaths"])
        .unwrap();

    let games: Vec<_> = tree
        .leaves_keyed(search_paths, "Game")
        .into_iter()
        .map(|l| l.value.as_str())
        .collect();
    assert_eq!(games, vec!["|gameinfo_path|.", "hl2", "platform"]);
    assert_eq!(tree.depth(), 3);
}

#[test]
fn given_gameinfo_fixture_when_parsing_then_reads_unquoted_values() {
    let tree = TreeBuilder::parse_str(&fixture("gameinfo.txt")).unwrap();
    let game_info = tree.branch(tree.root(), "GameInfo").unwrap();
    let file_system = tree.branch(game_info, "FileSystem").unwrap();

    assert_eq!(tree.leaves_keyed(game_info, "type")[0].value, "singleplayer_only");
    assert_eq!(tree.leaves_keyed(file_system, "SteamAppId")[0].value, "220");
}

// ============================================================
// Tokenizer equivalences
// ============================================================

#[rstest]
#[case("\"Game\" \"Half-Life 2\"", "Half-Life 2")]
#[case("Game Half-Life2", "Half-Life2")]
fn given_quoted_or_bare_key_when_parsing_then_key_is_game(#[case] line: &str, #[case] value: &str) {
    let tree = parse([line]).unwrap();
    let leaves = tree.leaves_keyed(tree.root(), "Game");
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].value, value);
}

#[test]
fn given_only_comments_and_blank_lines_when_parsing_then_root_is_empty() {
    let tree = parse(["// header", "", "   ", "\t// indented", "//"]).unwrap();
    let root = tree.get(tree.root()).unwrap();
    assert!(root.leaves().is_empty());
    assert!(root.children().is_empty());
    assert_eq!(tree, KvTree::new());
}

// ============================================================
// Balance errors
// ============================================================

#[test]
fn given_extra_close_when_parsing_then_unbalanced_close() {
    let result = TreeBuilder::parse_str(&fixture("unbalanced.txt"));
    assert_eq!(result, Err(DomainError::UnbalancedClose { line: 5 }));
}

#[rstest]
#[case(&["}"])]
#[case(&["a b", "}"])]
fn given_close_at_root_when_parsing_then_fails(#[case] lines: &[&str]) {
    assert!(matches!(
        parse(lines.iter()),
        Err(DomainError::UnbalancedClose { .. })
    ));
}

#[test]
fn given_truncated_document_when_parsing_then_unclosed_branch() {
    let result = parse(["\"GameInfo\"", "{", "game hl2"]);
    assert_eq!(
        result,
        Err(DomainError::UnclosedBranch {
            name: "GameInfo".into()
        })
    );
}

#[test]
fn given_same_input_when_parsing_twice_then_same_tree() {
    let text = fixture("gameinfo.txt");
    assert_eq!(
        TreeBuilder::parse_str(&text).unwrap(),
        TreeBuilder::parse_str(&text).unwrap()
    );
}
