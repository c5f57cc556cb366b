use crate::api;
use chrono::prelude::*;
use clap::Args;
use gloo::timers::callback::{Interval, Timeout};
use nanpure_core as board;
use nanpure_core::ToNdIndex;
use nanpure_protocol as protocol;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use web_sys::HtmlInputElement;
use yew::prelude::*;

fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap()
}

/// How long the win banner stays up before hiding itself.
const BANNER_TIMEOUT_MS: u32 = 4_000;
const CLOCK_TICK_MS: u32 = 500;

/// Validation styling of one editable cell. Never persisted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) enum CellFeedback {
    #[default]
    Unchecked,
    Legal,
    Conflict,
}

impl CellFeedback {
    const fn class(self) -> Option<&'static str> {
        match self {
            Self::Unchecked => None,
            Self::Legal => Some("ok"),
            Self::Conflict => Some("err"),
        }
    }
}

/// Render state of one cell, derived fresh every view pass.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum ViewCellState {
    /// A given: rendered read-only for the whole session.
    Fixed(u8),
    /// Player-editable working value plus its validation styling.
    Editable(u8, CellFeedback),
}

impl ViewCellState {
    const fn value(self) -> u8 {
        match self {
            Self::Fixed(value) | Self::Editable(value, _) => value,
        }
    }
}

/// Per-puzzle session state owned by the board component. Rendering and the
/// edit handlers receive this by reference; nothing lives in globals.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct BoardSession {
    puzzle_id: String,
    engine: board::BoardEngine,
    feedback: Array2<CellFeedback>,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
}

impl BoardSession {
    fn new(puzzle_id: String, givens: board::Givens) -> Self {
        let side = board::GRID_SIZE as usize;
        Self {
            puzzle_id,
            engine: board::BoardEngine::new(givens),
            feedback: Array2::default((side, side)),
            started_at: None,
            ended_at: None,
        }
    }

    fn is_won(&self) -> bool {
        self.engine.is_won()
    }

    fn blank_count(&self) -> usize {
        self.engine.blank_count()
    }

    fn to_rows(&self) -> protocol::GridRows {
        self.engine.to_rows()
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    fn cell_state_at(&self, coords: board::Coord2) -> ViewCellState {
        if self.engine.is_fixed(coords) {
            ViewCellState::Fixed(self.engine.givens().value_at(coords))
        } else {
            ViewCellState::Editable(
                self.engine.entry_at(coords),
                self.feedback[coords.to_nd_index()],
            )
        }
    }

    /// Applies one sanitized entry. Clearing also wipes the cell's styling;
    /// entering leaves the old styling up until a response replaces it.
    fn apply_edit(
        &mut self,
        coords: board::Coord2,
        entry: u8,
        now: DateTime<Utc>,
    ) -> Option<board::EditOutcome> {
        let outcome = match self.engine.set_entry(coords, entry) {
            Ok(outcome) => outcome,
            Err(err) => {
                log::debug!("edit rejected at {:?}: {}", coords, err);
                return None;
            }
        };

        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        if matches!(outcome, board::EditOutcome::Cleared) {
            self.feedback[coords.to_nd_index()] = CellFeedback::Unchecked;
        }
        Some(outcome)
    }

    fn set_feedback(&mut self, coords: board::Coord2, feedback: CellFeedback) {
        self.feedback[coords.to_nd_index()] = feedback;
    }

    /// Blur cleanup: leftover styling on a blank cell is dropped.
    fn clear_feedback_if_blank(&mut self, coords: board::Coord2) -> bool {
        if self.engine.entry_at(coords) == 0
            && self.feedback[coords.to_nd_index()] != CellFeedback::Unchecked
        {
            self.feedback[coords.to_nd_index()] = CellFeedback::Unchecked;
            true
        } else {
            false
        }
    }

    fn mark_won(&mut self, now: DateTime<Utc>) {
        self.engine.mark_won();
        if self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }
}

fn format_for_counter(num: i32) -> String {
    match num {
        ..0 => "000".to_string(),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum CellMsg {
    Edited { pos: board::Coord2, entry: u8 },
    Blurred { pos: board::Coord2 },
}

/// Settled result of one validate round-trip. Transport failures surface as
/// `Unreachable` and leave the cell indeterminate rather than conflicted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum ValidateOutcome {
    Settled { valid: bool },
    Unreachable,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum CheckOutcome {
    Settled { complete: bool, valid: bool },
    Unreachable,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) enum Msg {
    CellEvent(CellMsg),
    NewGame,
    PuzzleLoaded(protocol::PuzzleResponse),
    PuzzleFailed(String),
    EntryValidated {
        puzzle_id: String,
        pos: board::Coord2,
        outcome: ValidateOutcome,
    },
    GridChecked {
        puzzle_id: String,
        outcome: CheckOutcome,
    },
    HideBanner,
    UpdateTime,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    row: board::Coord,
    col: board::Coord,
    cell_state: ViewCellState,
    #[prop_or_default]
    locked: bool,
    callback: Callback<CellMsg>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    use ViewCellState::*;

    let CellProps {
        row,
        col,
        cell_state,
        locked,
        callback,
    } = props.clone();

    let class = classes!(
        "cell",
        match cell_state {
            Fixed(_) => classes!("fixed"),
            Editable(_, feedback) => classes!(feedback.class()),
        }
    );
    let fixed = matches!(cell_state, Fixed(_));
    let value = board::display_entry(cell_state.value());

    let oninput = {
        let callback = callback.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let entry = board::sanitize_entry(&input.value());
            // write the digit straight back so no stray character stays visible
            input.set_value(board::display_entry(entry));
            callback.emit(CellMsg::Edited {
                pos: (row, col),
                entry,
            });
            log::trace!("({}, {}) input -> {}", row, col, entry);
        })
    };

    let onblur = {
        let callback = callback.clone();
        Callback::from(move |_: FocusEvent| {
            callback.emit(CellMsg::Blurred { pos: (row, col) });
            log::trace!("({}, {}) blur", row, col);
        })
    };

    html! {
        <input
            type="text"
            inputmode="numeric"
            maxlength="1"
            autocomplete="off"
            {class}
            {value}
            disabled={fixed || locked}
            {oninput}
            {onblur}
        />
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct BoardProps {
    /// Base URL of the validation service, same-origin when empty
    #[arg(short, long, default_value = "")]
    pub api: String,
}

pub(crate) struct BoardView {
    api_base: String,
    session: Option<BoardSession>,
    load_error: Option<String>,
    banner_open: bool,
    prev_time: u32,
    banner_timer: Option<Timeout>,
    _clock: Interval,
}

impl BoardView {
    fn create_clock(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(CLOCK_TICK_MS, move || link.send_message(Msg::UpdateTime))
    }

    fn create_banner_timer(ctx: &Context<Self>) -> Timeout {
        let link = ctx.link().clone();
        Timeout::new(BANNER_TIMEOUT_MS, move || {
            link.send_message(Msg::HideBanner)
        })
    }

    fn spawn_load(ctx: &Context<Self>, api_base: String) {
        ctx.link().send_future(async move {
            match api::fetch_puzzle(&api_base).await {
                Ok(puzzle) => Msg::PuzzleLoaded(puzzle),
                Err(err) => Msg::PuzzleFailed(err.to_string()),
            }
        });
    }

    fn spawn_validate(
        &self,
        ctx: &Context<Self>,
        puzzle_id: String,
        pos: board::Coord2,
        value: u8,
    ) {
        let api_base = self.api_base.clone();
        let request = protocol::ValidateRequest {
            id: puzzle_id.clone(),
            row: pos.0,
            col: pos.1,
            value,
        };
        ctx.link().send_future(async move {
            let outcome = match api::validate_entry(&api_base, &request).await {
                Ok(response) => {
                    if let Some(reason) = &response.reason {
                        log::debug!("placement rejected: {}", reason);
                    }
                    ValidateOutcome::Settled {
                        valid: response.valid,
                    }
                }
                Err(err) => {
                    log::warn!("validate call failed: {}", err);
                    ValidateOutcome::Unreachable
                }
            };
            Msg::EntryValidated {
                puzzle_id,
                pos,
                outcome,
            }
        });
    }

    fn spawn_check(&self, ctx: &Context<Self>, puzzle_id: String, grid: protocol::GridRows) {
        let api_base = self.api_base.clone();
        let request = protocol::CheckRequest {
            id: puzzle_id.clone(),
            grid,
        };
        ctx.link().send_future(async move {
            let outcome = match api::check_grid(&api_base, &request).await {
                Ok(response) => CheckOutcome::Settled {
                    complete: response.complete,
                    valid: response.valid,
                },
                Err(err) => {
                    // a failed completion probe never disturbs the board
                    log::debug!("check call failed: {}", err);
                    CheckOutcome::Unreachable
                }
            };
            Msg::GridChecked { puzzle_id, outcome }
        });
    }

    /// Responses that outlive their puzzle are dropped here.
    fn session_for(&mut self, puzzle_id: &str) -> Option<&mut BoardSession> {
        self.session
            .as_mut()
            .filter(|session| session.puzzle_id == puzzle_id)
    }

    fn get_time(&self) -> u32 {
        self.session
            .as_ref()
            .map(|session| session.elapsed_secs(utc_now()))
            .unwrap_or(0)
    }

    fn blanks_left(&self) -> i32 {
        self.session
            .as_ref()
            .map_or(0, |session| session.blank_count() as i32)
    }

    fn session_state_class(&self) -> Classes {
        classes!(match (&self.session, &self.load_error) {
            (Some(session), _) if session.is_won() => "won",
            (Some(_), _) => "in-progress",
            (None, Some(_)) => "load-failed",
            (None, None) => "loading",
        })
    }

    fn on_cell_edited(&mut self, ctx: &Context<Self>, pos: board::Coord2, entry: u8) -> bool {
        let (outcome, puzzle_id) = {
            let Some(session) = self.session.as_mut() else {
                return false;
            };
            // fast path once won; the disabled inputs are the authoritative guard
            if session.is_won() {
                return false;
            }
            let Some(outcome) = session.apply_edit(pos, entry, utc_now()) else {
                return false;
            };
            (outcome, session.puzzle_id.clone())
        };

        if let board::EditOutcome::Entered(value) = outcome {
            self.spawn_validate(ctx, puzzle_id, pos, value);
        }
        true
    }

    fn on_puzzle_loaded(&mut self, puzzle: protocol::PuzzleResponse) -> bool {
        match board::Givens::from_rows(puzzle.givens) {
            Ok(givens) => {
                log::info!("puzzle {} loaded ({} givens)", puzzle.id, givens.given_count());
                self.session = Some(BoardSession::new(puzzle.id, givens));
                self.load_error = None;
            }
            Err(err) => {
                log::error!("puzzle {} is malformed: {}", puzzle.id, err);
                self.session = None;
                self.load_error = Some(err.to_string());
            }
        }
        self.banner_open = false;
        self.banner_timer = None;
        self.prev_time = 0;
        true
    }

    fn on_entry_validated(
        &mut self,
        ctx: &Context<Self>,
        puzzle_id: &str,
        pos: board::Coord2,
        outcome: ValidateOutcome,
    ) -> bool {
        // responses apply in completion order: the last one wins per cell
        let rows = {
            let Some(session) = self.session_for(puzzle_id) else {
                return false;
            };
            match outcome {
                ValidateOutcome::Settled { valid } => {
                    session.set_feedback(
                        pos,
                        if valid {
                            CellFeedback::Legal
                        } else {
                            CellFeedback::Conflict
                        },
                    );
                    valid.then(|| session.to_rows())
                }
                ValidateOutcome::Unreachable => {
                    // indeterminate, not a conflict
                    session.set_feedback(pos, CellFeedback::Unchecked);
                    None
                }
            }
        };

        if let Some(grid) = rows {
            self.spawn_check(ctx, puzzle_id.to_string(), grid);
        }
        true
    }

    fn on_grid_checked(
        &mut self,
        ctx: &Context<Self>,
        puzzle_id: &str,
        outcome: CheckOutcome,
    ) -> bool {
        let CheckOutcome::Settled { complete, valid } = outcome else {
            return false;
        };
        if !(complete && valid) {
            return false;
        }

        let now = utc_now();
        let Some(session) = self.session_for(puzzle_id) else {
            return false;
        };
        if session.is_won() {
            return false;
        }

        session.mark_won(now);
        self.banner_open = true;
        self.banner_timer = Some(Self::create_banner_timer(ctx));
        log::info!("puzzle {} solved", puzzle_id);
        true
    }

    fn view_block(
        ctx: &Context<Self>,
        session: &BoardSession,
        block: board::Coord2,
        locked: bool,
    ) -> Html {
        let cells = (0..board::BOX_SIZE).flat_map(|inner_row| {
            (0..board::BOX_SIZE).map(move |inner_col| (inner_row, inner_col))
        });

        html! {
            <div class="block">
                {
                    for cells.map(|inner| {
                        let (row, col) = board::block_cell(block, inner);
                        let cell_state = session.cell_state_at((row, col));
                        let callback = ctx.link().callback(Msg::CellEvent);
                        html! {
                            <CellView {row} {col} {cell_state} {callback} {locked}/>
                        }
                    })
                }
            </div>
        }
    }

    fn view_board(&self, ctx: &Context<Self>) -> Html {
        let Some(session) = self.session.as_ref() else {
            return if self.load_error.is_some() {
                let cb_retry = ctx.link().callback(|_| Msg::NewGame);
                html! {
                    <div class="board load-failed">
                        <button onclick={cb_retry}>{"Retry"}</button>
                    </div>
                }
            } else {
                html! { <div class="board loading"/> }
            };
        };

        let locked = session.is_won();
        let blocks = (0..board::BOX_SIZE).flat_map(|block_row| {
            (0..board::BOX_SIZE).map(move |block_col| (block_row, block_col))
        });

        html! {
            <div class="board">
                {
                    for blocks.map(|block| Self::view_block(ctx, session, block, locked))
                }
            </div>
        }
    }
}

impl Component for BoardView {
    type Message = Msg;
    type Properties = BoardProps;

    fn create(ctx: &Context<Self>) -> Self {
        let api_base = ctx.props().api.clone();
        Self::spawn_load(ctx, api_base.clone());
        Self {
            api_base,
            session: None,
            load_error: None,
            banner_open: false,
            prev_time: 0,
            banner_timer: None,
            _clock: Self::create_clock(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use CellMsg::*;
        use Msg::*;

        match msg {
            CellEvent(Edited { pos, entry }) => self.on_cell_edited(ctx, pos, entry),
            CellEvent(Blurred { pos }) => self
                .session
                .as_mut()
                .is_some_and(|session| session.clear_feedback_if_blank(pos)),
            NewGame => {
                log::debug!("loading a new puzzle");
                self.session = None;
                self.load_error = None;
                self.banner_open = false;
                self.banner_timer = None;
                self.prev_time = 0;
                Self::spawn_load(ctx, self.api_base.clone());
                true
            }
            PuzzleLoaded(puzzle) => self.on_puzzle_loaded(puzzle),
            PuzzleFailed(message) => {
                log::error!("puzzle load failed: {}", message);
                self.session = None;
                self.load_error = Some(message);
                true
            }
            EntryValidated {
                puzzle_id,
                pos,
                outcome,
            } => self.on_entry_validated(ctx, &puzzle_id, pos, outcome),
            GridChecked { puzzle_id, outcome } => self.on_grid_checked(ctx, &puzzle_id, outcome),
            HideBanner => {
                self.banner_timer = None;
                if self.banner_open {
                    self.banner_open = false;
                    true
                } else {
                    false
                }
            }
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let state_class = classes!(self.session_state_class());
        let blanks_left = format_for_counter(self.blanks_left());
        let elapsed_time = format_for_counter(self.get_time() as i32);
        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });

        html! {
            <div class="nanpure">
                <nav>
                    <aside>{blanks_left}</aside>
                    <span><button class={state_class} onclick={cb_new_game}/></span>
                    <aside>{elapsed_time}</aside>
                </nav>
                { self.view_board(ctx) }
                <dialog id="win-banner" open={self.banner_open}>
                    <article>{"Solved!"}</article>
                </dialog>
            </div>
        }
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn the_js_clock_maps_into_chrono() {
        assert!(utc_now().timestamp_millis() > 0);
    }
}
