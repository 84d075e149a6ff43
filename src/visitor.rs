use pgn_reader::{Nag, Outcome, RawComment, RawTag, SanPlus, Skip, Visitor};
use smallvec::SmallVec;
use std::ops::ControlFlow;

pub type Mainline = SmallVec<[SanPlus; 128]>;

macro_rules! pgn_visitor_skip_variations {
    () => {
        fn nag(&mut self, _: &mut Self::Movetext, _: Nag) -> ControlFlow<Self::Output> {
            ControlFlow::Continue(())
        }

        fn comment(
            &mut self,
            _: &mut Self::Movetext,
            _: RawComment<'_>,
        ) -> ControlFlow<Self::Output> {
            ControlFlow::Continue(())
        }

        fn partial_comment(
            &mut self,
            _: &mut Self::Movetext,
            _: RawComment<'_>,
        ) -> ControlFlow<Self::Output> {
            ControlFlow::Continue(())
        }

        fn begin_variation(&mut self, _: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
            ControlFlow::Continue(Skip(true))
        }
    };
}

/// Tags the converter cares about. Everything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub round: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub fen: Option<String>,
    pub variant: Option<String>,
    pub(crate) tag_count: usize,
}

impl Headers {
    /// Later duplicates of a tag replace earlier ones.
    fn set_known_tag(&mut self, key: &[u8], value: RawTag<'_>) {
        self.tag_count += 1;

        let slot = match key {
            b"Event" => &mut self.event,
            b"Site" => &mut self.site,
            b"Date" => &mut self.date,
            b"Round" => &mut self.round,
            b"White" => &mut self.white,
            b"Black" => &mut self.black,
            b"Result" => &mut self.result,
            b"FEN" => &mut self.fen,
            b"Variant" => &mut self.variant,
            _ => return,
        };

        *slot = Some(value.decode_utf8_lossy().into_owned());
    }

    pub fn is_empty(&self) -> bool {
        self.tag_count == 0
    }
}

/// Tags plus principal variation of one game record.
#[derive(Debug, Clone, Default)]
pub struct ParsedGame {
    pub headers: Headers,
    pub mainline: Mainline,
    pub outcome: Option<String>,
}

impl ParsedGame {
    /// True when the record carried nothing at all: no tags, no moves, no result.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.mainline.is_empty() && self.outcome.is_none()
    }
}

/// Streaming PGN visitor (pgn-reader).
///
/// Collects known tags and the mainline SAN tokens; comments, NAGs and
/// variations are skipped. Tokens are not checked for legality here, that
/// happens when they are rendered against a position.
#[derive(Debug, Default)]
pub struct GameVisitor;

impl GameVisitor {
    pub fn new() -> Self {
        Self
    }
}

impl Visitor for GameVisitor {
    type Tags = Headers;
    type Movetext = ParsedGame;
    type Output = ParsedGame;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(Headers::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        key: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.set_known_tag(key, value);
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(ParsedGame {
            headers: tags,
            mainline: Mainline::new(),
            outcome: None,
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        movetext.mainline.push(san);
        ControlFlow::Continue(())
    }

    pgn_visitor_skip_variations!();

    fn outcome(
        &mut self,
        movetext: &mut Self::Movetext,
        outcome: Outcome,
    ) -> ControlFlow<Self::Output> {
        movetext.outcome = Some(outcome.to_string());
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        movetext
    }
}
