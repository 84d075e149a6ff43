use crate::error::GameError;
use crate::visitor::Headers;
use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::{CastlingMode, Chess, Color, Position};

fn castling_mode(variant: Option<&str>) -> Result<CastlingMode, GameError> {
    let Some(raw) = variant else {
        return Ok(CastlingMode::Standard);
    };

    match raw.trim().to_lowercase().as_str() {
        "" | "standard" | "chess" | "normal" | "from position" => Ok(CastlingMode::Standard),
        "chess960" | "chess 960" | "fischerandom" | "fischer random" => {
            Ok(CastlingMode::Chess960)
        }
        _ => Err(GameError::Parse(format!("unsupported variant '{}'", raw.trim()))),
    }
}

/// Position the mainline starts from: the `FEN` tag if present, else the
/// standard initial position.
pub fn starting_position(headers: &Headers) -> Result<Chess, GameError> {
    let mode = castling_mode(headers.variant.as_deref())?;

    let Some(raw) = headers.fen.as_deref() else {
        return Ok(Chess::default());
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Err(GameError::MissingData("FEN tag is empty".to_string()));
    }

    let fen = Fen::from_ascii(raw.as_bytes())
        .map_err(|e| GameError::Parse(format!("invalid FEN '{raw}': {e}")))?;

    fen.into_position::<Chess>(mode)
        .map_err(|e| GameError::Parse(format!("illegal FEN position '{raw}': {e}")))
}

fn move_label(pos: &Chess, token: &SanPlus) -> String {
    let number = pos.fullmoves();
    match pos.turn() {
        Color::White => format!("{number}. {token}"),
        Color::Black => format!("{number}... {token}"),
    }
}

/// Renders `token` as canonical SAN relative to `pos`, then plays it.
///
/// `pos` is left untouched when the token is not a legal move.
pub fn render_san(pos: &mut Chess, token: &SanPlus) -> Result<String, GameError> {
    if matches!(token.san, San::Null) {
        return Err(GameError::IllegalMove(format!(
            "{}: null move",
            move_label(pos, token)
        )));
    }

    let m = token
        .san
        .to_move(&*pos)
        .map_err(|e| GameError::IllegalMove(format!("{}: {}", move_label(pos, token), e)))?;

    Ok(SanPlus::from_move_and_play_unchecked(pos, m).to_string())
}

/// Renders the whole principal variation starting from `start`.
pub fn render_mainline<'a, I>(start: Chess, tokens: I) -> Result<Vec<String>, GameError>
where
    I: IntoIterator<Item = &'a SanPlus>,
{
    let mut pos = start;
    tokens
        .into_iter()
        .map(|token| render_san(&mut pos, token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(moves: &str) -> Vec<SanPlus> {
        moves
            .split_whitespace()
            .map(|token| token.parse().unwrap())
            .collect()
    }

    fn render(moves: &str) -> Result<Vec<String>, GameError> {
        render_mainline(Chess::default(), &tokens(moves))
    }

    fn headers_with_fen(fen: &str) -> Headers {
        Headers {
            fen: Some(fen.to_string()),
            ..Headers::default()
        }
    }

    #[test]
    fn test_render_basic_opening() {
        assert_eq!(render("e4 e5 Nf3").unwrap(), ["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_render_removes_redundant_disambiguation() {
        assert_eq!(render("e4 e5 Ngf3").unwrap(), ["e4", "e5", "Nf3"]);
    }

    #[test]
    fn test_render_adds_check_and_mate_suffixes() {
        assert_eq!(render("f3 e5 g4 Qh4").unwrap(), ["f3", "e5", "g4", "Qh4#"]);
        assert_eq!(render("e4 f6 Qh5").unwrap(), ["e4", "f6", "Qh5+"]);
    }

    #[test]
    fn test_render_castling() {
        assert_eq!(
            render("e4 e5 Nf3 Nc6 Bc4 Bc5 O-O").unwrap(),
            ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "O-O"]
        );
    }

    #[test]
    fn test_render_promotion() {
        let start =
            starting_position(&headers_with_fen("8/P7/8/8/8/8/8/k6K w - - 0 1")).unwrap();
        let moves = render_mainline(start, &tokens("a8=Q+")).unwrap();
        assert_eq!(moves, ["a8=Q+"]);
    }

    #[test]
    fn test_render_illegal_move_reports_move_number() {
        let err = render("e4 e5 Ke3").unwrap_err();
        match err {
            GameError::IllegalMove(msg) => assert!(msg.starts_with("2. Ke3"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_render_illegal_black_move_uses_ellipsis() {
        let err = render("e4 e4").unwrap_err();
        match err {
            GameError::IllegalMove(msg) => assert!(msg.starts_with("1... e4"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_render_null_move_is_rejected() {
        assert!(matches!(render("e4 --"), Err(GameError::IllegalMove(_))));
    }

    #[test]
    fn test_render_san_leaves_position_on_error() {
        let mut pos = Chess::default();
        let token: SanPlus = "Ke2".parse().unwrap();
        assert!(render_san(&mut pos, &token).is_err());
        assert_eq!(pos.board(), Chess::default().board());
        assert_eq!(pos.turn(), Color::White);
    }

    #[test]
    fn test_starting_position_defaults_to_standard() {
        let start = starting_position(&Headers::default()).unwrap();
        assert_eq!(start.board(), Chess::default().board());
        assert_eq!(start.turn(), Color::White);
    }

    #[test]
    fn test_starting_position_from_fen_black_to_move() {
        let start =
            starting_position(&headers_with_fen("4k3/8/8/8/8/8/4P3/4K3 b - - 0 1")).unwrap();
        assert_eq!(start.turn(), Color::Black);
        assert_eq!(render_mainline(start, &tokens("Kd7")).unwrap(), ["Kd7"]);
    }

    #[test]
    fn test_starting_position_rejects_empty_fen() {
        assert!(matches!(
            starting_position(&headers_with_fen("  ")),
            Err(GameError::MissingData(_))
        ));
    }

    #[test]
    fn test_starting_position_rejects_malformed_fen() {
        assert!(matches!(
            starting_position(&headers_with_fen("not a fen")),
            Err(GameError::Parse(_))
        ));
    }

    #[test]
    fn test_starting_position_rejects_illegal_position() {
        // No kings on the board.
        assert!(matches!(
            starting_position(&headers_with_fen("8/8/8/8/8/8/8/8 w - - 0 1")),
            Err(GameError::Parse(_))
        ));
    }

    #[test]
    fn test_starting_position_rejects_unknown_variant() {
        let headers = Headers {
            variant: Some("Crazyhouse".to_string()),
            ..Headers::default()
        };
        match starting_position(&headers) {
            Err(GameError::Parse(msg)) => assert!(msg.contains("Crazyhouse")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_castling_mode_accepts_chess960_spellings() {
        for raw in ["Chess960", "chess 960", "Fischerandom"] {
            assert_eq!(castling_mode(Some(raw)).unwrap(), CastlingMode::Chess960);
        }
        assert_eq!(castling_mode(None).unwrap(), CastlingMode::Standard);
    }

    #[test]
    fn test_render_chess960_castling_from_fen() {
        let headers = Headers {
            variant: Some("Chess960".to_string()),
            ..headers_with_fen("k7/8/8/8/8/8/8/5KR1 w G - 0 1")
        };
        let start = starting_position(&headers).unwrap();
        assert_eq!(render_mainline(start, &tokens("O-O Kb7")).unwrap(), ["O-O", "Kb7"]);
    }
}
