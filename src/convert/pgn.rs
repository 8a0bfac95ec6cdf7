use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_REGEX: Regex = Regex::new(r#"^\[(\w+)\s+"((?:[^"\\]|\\.)*)"\]$"#).unwrap();
    static ref MOVE_NUMBER_REGEX: Regex = Regex::new(r"^\d+\.+").unwrap();
    static ref CLOCK_REGEX: Regex = Regex::new(r"\[%clk\s+([^\]\s]+)\s*\]").unwrap();
    static ref EVAL_REGEX: Regex = Regex::new(r"\[%eval\s+([^\]\s,]+)").unwrap();
}

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// A single game as it appears in the archive: the tag pairs and the raw movetext.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PgnGame {
    pub tags: Vec<(String, String)>,
    pub movetext: String,
}

impl PgnGame {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn moves(&self) -> Vec<PgnMove> {
        parse_movetext(&self.movetext)
    }
}

/// A half-move with the annotations Lichess writes in the comment right after it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PgnMove {
    pub san: String,
    pub clock: Option<String>,
    pub eval: Option<String>,
}

fn unescape(value: &str) -> String {
    value.replace("\\\"", "\"").replace("\\\\", "\\")
}

/// Splits an archive into games. A tag line that follows movetext starts a new game, as
/// does a second `Event` tag for games that have no movetext at all.
pub fn split_games(pgn: &str) -> Vec<PgnGame> {
    let mut games = Vec::new();
    let mut current = PgnGame::default();
    let mut in_movetext = false;

    for line in pgn.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(captures) = TAG_REGEX.captures(line) {
            let repeated_event = &captures[1] == "Event" && current.tag("Event").is_some();
            if in_movetext || repeated_event {
                games.push(std::mem::take(&mut current));
                in_movetext = false;
            }

            current.tags.push((captures[1].to_string(), unescape(&captures[2])));
            continue;
        }

        in_movetext = true;
        if !current.movetext.is_empty() {
            current.movetext.push(' ');
        }
        current.movetext.push_str(line);
    }

    if !current.tags.is_empty() || !current.movetext.is_empty() {
        games.push(current);
    }

    games
}

/// Extracts the mainline moves. Variations, NAGs, move numbers and the result are skipped.
pub fn parse_movetext(movetext: &str) -> Vec<PgnMove> {
    let chars = movetext.chars().collect::<Vec<_>>();
    let mut moves: Vec<PgnMove> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '{' => {
                let end = find_closing(&chars, i, '}');
                let comment = chars[i + 1..end].iter().collect::<String>();

                if let Some(last) = moves.last_mut() {
                    annotate(last, &comment);
                }
                i = end + 1;
            }
            '(' => {
                i = skip_variation(&chars, i);
            }
            c if c.is_whitespace() || c == ')' => {
                i += 1;
            }
            _ => {
                let start = i;
                while i < chars.len() && !chars[i].is_whitespace() && !matches!(chars[i], '{' | '(' | ')') {
                    i += 1;
                }

                let token = chars[start..i].iter().collect::<String>();
                if let Some(san) = san_token(&token) {
                    moves.push(PgnMove {
                        san: san.to_string(),
                        ..Default::default()
                    });
                }
            }
        }
    }

    moves
}

// Returns the index of `close`, or the end of input for an unterminated comment
fn find_closing(chars: &[char], open: usize, close: char) -> usize {
    chars[open + 1..]
        .iter()
        .position(|c| *c == close)
        .map(|x| x + open + 1)
        .unwrap_or(chars.len())
}

fn skip_variation(chars: &[char], open: usize) -> usize {
    let mut depth = 0;
    let mut i = open;

    while i < chars.len() {
        match chars[i] {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            '{' => i = find_closing(chars, i, '}'),
            _ => (),
        }
        i += 1;
    }

    chars.len()
}

fn san_token(token: &str) -> Option<&str> {
    let token = MOVE_NUMBER_REGEX
        .find(token)
        .map(|x| &token[x.end()..])
        .unwrap_or(token);

    if token.is_empty() || token.starts_with('$') || RESULT_TOKENS.contains(&token) {
        return None;
    }

    Some(token)
}

fn annotate(pgn_move: &mut PgnMove, comment: &str) {
    if let Some(captures) = CLOCK_REGEX.captures(comment) {
        pgn_move.clock = Some(captures[1].to_string());
    }
    if let Some(captures) = EVAL_REGEX.captures(comment) {
        pgn_move.eval = Some(captures[1].to_string());
    }
}

#[cfg(test)]
const TWO_GAMES: &str = r#"[Event "Rated Blitz game"]
[Site "https://lichess.org/abcdefgh"]
[White "alice"]
[Black "bob"]
[Result "1-0"]

1. e4 { [%eval 0.36] [%clk 0:05:00] } 1... e5 { [%eval 0.2] [%clk 0:05:00] } 2. Qh5 Nc6 3. Bc4 Nf6?? 4. Qxf7# 1-0

[Event "Casual Correspondence game"]
[White "carol \"the rook\""]
[Black "alice"]
[Result "*"]

*
"#;

#[test]
fn check_split_games() {
    let games = split_games(TWO_GAMES);

    assert_eq!(games.len(), 2);
    assert_eq!(games[0].tag("Event"), Some("Rated Blitz game"));
    assert_eq!(games[0].tag("Result"), Some("1-0"));
    assert_eq!(games[0].tag("ECO"), None);
    assert_eq!(games[1].tag("White"), Some("carol \"the rook\""));
    assert_eq!(games[1].movetext, "*");
}

#[test]
fn check_parse_movetext_with_annotations() {
    let games = split_games(TWO_GAMES);
    let moves = games[0].moves();

    let sans = moves.iter().map(|x| x.san.as_str()).collect::<Vec<_>>();
    assert_eq!(sans, vec!["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6??", "Qxf7#"]);

    assert_eq!(moves[0].clock.as_deref(), Some("0:05:00"));
    assert_eq!(moves[0].eval.as_deref(), Some("0.36"));
    assert_eq!(moves[1].eval.as_deref(), Some("0.2"));
    assert_eq!(moves[2].clock, None);

    assert!(games[1].moves().is_empty());
}

#[test]
fn check_variations_and_nags_are_skipped() {
    let moves = parse_movetext("1.d4 $1 d5 (1... Nf6 { main alternative (sharp) } 2. c4) 2.c4 { [%eval #-3] } 1/2-1/2");

    let sans = moves.iter().map(|x| x.san.as_str()).collect::<Vec<_>>();
    assert_eq!(sans, vec!["d4", "d5", "c4"]);
    assert_eq!(moves[2].eval.as_deref(), Some("#-3"));
}

#[test]
fn check_games_without_movetext_are_split() {
    let pgn = "[Event \"Casual Blitz game\"]\n[Result \"*\"]\n\n[Event \"Casual Blitz game\"]\n[Result \"*\"]\n\n[Event \"Rated Blitz game\"]\n[Result \"*\"]\n\n1. e4 *\n";
    let games = split_games(pgn);

    assert_eq!(games.len(), 3);
    assert!(games[0].movetext.is_empty());
    assert!(games[1].movetext.is_empty());
    assert_eq!(games[2].tag("Event"), Some("Rated Blitz game"));
    assert_eq!(games[2].movetext, "1. e4 *");
}
