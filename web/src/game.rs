use crate::backend::{Backend, BackendConfig, BackendError};
use crate::leaderboard::LeaderboardView;
use crate::settings::{CadenceArg, Settings};
use crate::timers::LinkHost;
use crate::utils::*;
use clap::Args;
use game::{CellIndex, RoundUpdate, SessionState};
use web_sys::HtmlInputElement;
use whacabol_core as game;
use whacabol_protocol::auth::Identity;
use whacabol_protocol::{self as protocol, PlayerName, SubmitOutcome};
use yew::prelude::*;

/// End-of-round submission flow.
#[derive(Clone, Debug, PartialEq)]
enum Submission {
    Editing,
    Pending,
    Done(SubmitOutcome),
    Failed(String),
}

impl Submission {
    fn shows_form(&self) -> bool {
        matches!(self, Self::Editing | Self::Pending)
    }

    fn status(&self) -> Option<String> {
        match self {
            Self::Editing => None,
            Self::Pending => Some("saving...".to_string()),
            Self::Done(outcome) => Some(outcome.message().to_string()),
            Self::Failed(err) => Some(format!("could not submit score: {err}")),
        }
    }
}

/// Player-facing text around the grid: the transient error line and the end-of-round form.
#[derive(Clone, Debug, PartialEq)]
struct Feedback {
    notice: Option<String>,
    player_name: String,
    name_error: Option<String>,
    submission: Submission,
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            notice: None,
            player_name: String::new(),
            name_error: None,
            submission: Submission::Editing,
        }
    }
}

impl Feedback {
    /// A new round drops the previous messages but remembers the name typed last time.
    fn start(&mut self) {
        self.notice = None;
        self.name_error = None;
        self.submission = Submission::Editing;
    }

    /// Back to the pre-game screen with everything cleared.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
pub(crate) enum Msg {
    Start,
    Reset,
    Hit(CellIndex),
    Timer(game::TimerEvent),
    IdentityReady(Result<Identity, BackendError>),
    NameInput(String),
    SubmitName,
    Submitted(Result<(Identity, SubmitOutcome), BackendError>),
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    cell: CellIndex,
    revealed: bool,
    #[prop_or_default]
    playable: bool,
    callback: Callback<CellIndex>,
}

#[function_component(CellView)]
fn cell_component(props: &CellProps) -> Html {
    let CellProps {
        cell,
        revealed,
        playable,
        callback,
    } = props.clone();

    let class = classes!("cell", revealed.then_some("mole"), playable.then_some("playable"));

    let onpointerdown = Callback::from(move |e: PointerEvent| {
        e.prevent_default();
        log::trace!("cell {} pointer down", cell);
        callback.emit(cell);
    });

    html! {
        <td {class} {onpointerdown}/>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Reveal cadence, stored for later visits
    #[arg(long, value_enum)]
    cadence: Option<CadenceArg>,
}

pub(crate) struct GameView {
    round: game::Round<LinkHost>,
    backend: Option<Backend>,
    identity: Option<Identity>,
    offline: Option<String>,
    feedback: Feedback,
    leaderboard_refresh: u32,
}

impl GameView {
    fn submit(&mut self, ctx: &Context<Self>) -> bool {
        let session = self.round.session();
        let feedback = &mut self.feedback;
        if session.state() != SessionState::Finished || feedback.submission != Submission::Editing {
            return false;
        }

        let name = match PlayerName::parse(&feedback.player_name) {
            Ok(name) => name,
            Err(err) => {
                feedback.name_error = Some(err.to_string());
                return true;
            }
        };
        feedback.name_error = None;

        let (Some(backend), Some(identity)) = (self.backend.clone(), self.identity.clone()) else {
            feedback.submission = Submission::Failed(BackendError::NotSignedIn.to_string());
            return true;
        };

        let score = session.score();
        log::debug!("submitting {} for {} as {}", score, identity.uid, name);
        feedback.submission = Submission::Pending;
        ctx.link().send_future(async move {
            Msg::Submitted(submit_as(backend, identity, name, score).await)
        });
        true
    }

    fn view_controls(&self, ctx: &Context<Self>) -> Html {
        let session = self.round.session();
        let feedback = &self.feedback;
        let cb_start = ctx.link().callback(|_: MouseEvent| Msg::Start);

        match session.state() {
            SessionState::Ready => html! {
                <button class="start" onclick={cb_start}>{"Start"}</button>
            },
            SessionState::Active => html! {},
            SessionState::Finished if feedback.submission.shows_form() => {
                let pending = feedback.submission == Submission::Pending;
                let cb_reset = ctx.link().callback(|_: MouseEvent| Msg::Reset);
                let onsubmit = ctx.link().callback(|e: SubmitEvent| {
                    e.prevent_default();
                    Msg::SubmitName
                });
                let oninput = ctx.link().callback(|e: InputEvent| {
                    Msg::NameInput(e.target_unchecked_into::<HtmlInputElement>().value())
                });

                html! {
                    <form class="submit" {onsubmit}>
                        <p>{format!("Game over! You scored {}.", session.score())}</p>
                        <input
                            type="text"
                            placeholder="Your name"
                            maxlength={PlayerName::MAX_CHARS.to_string()}
                            value={feedback.player_name.clone()}
                            disabled={pending}
                            {oninput}
                        />
                        <button type="submit" disabled={pending}>{"Submit"}</button>
                        <button type="button" disabled={pending} onclick={cb_reset}>{"Skip"}</button>
                        if let Some(err) = &feedback.name_error {
                            <p class="error">{err.clone()}</p>
                        }
                        if let Some(status) = feedback.submission.status() {
                            <p class="status">{status}</p>
                        }
                    </form>
                }
            }
            SessionState::Finished => {
                let class = classes!(
                    "status",
                    matches!(feedback.submission, Submission::Failed(_)).then_some("error")
                );
                let cb_reset = ctx.link().callback(|_: MouseEvent| Msg::Reset);
                html! {
                    <div class="result">
                        <p>{format!("Game over! You scored {}.", session.score())}</p>
                        if let Some(status) = feedback.submission.status() {
                            <p {class}>{status}</p>
                        }
                        <button class="start" onclick={cb_reset}>{"Play again"}</button>
                    </div>
                }
            }
        }
    }
}

/// Makes sure the token is still valid, then runs the conditional write under the same uid.
async fn submit_as(
    backend: Backend,
    identity: Identity,
    name: PlayerName,
    score: game::Score,
) -> Result<(Identity, SubmitOutcome), BackendError> {
    let identity = backend.ensure_fresh(identity).await?;
    let store = backend.store(Some(&identity));
    let outcome = protocol::submit_score(&store, &identity.uid, &name, score).await?;
    Ok((identity, outcome))
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let settings = Settings::load(props.cadence);
        let seed = props.seed.unwrap_or_else(js_random_seed);
        log::debug!("seed: {}", seed);

        let scheduler = game::MoleScheduler::new(seed, settings.cadence);
        let round = game::Round::new(LinkHost::new(ctx.link().clone()), scheduler);

        let (backend, offline) = match BackendConfig::from_build_env() {
            Ok(config) => (Some(Backend::new(config)), None),
            Err(err) => {
                let err = BackendError::from(err);
                log::error!("{}", err);
                (None, Some(err.to_string()))
            }
        };

        if let Some(backend) = backend.clone() {
            let stored = local_load::<Identity>();
            ctx.link().send_future(async move {
                Msg::IdentityReady(backend.acquire_identity(stored).await)
            });
        }

        Self {
            round,
            backend,
            identity: None,
            offline,
            feedback: Feedback::default(),
            leaderboard_refresh: 0,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Start => {
                self.round.start();
                self.feedback.start();
                true
            }
            Reset => {
                self.round.reset();
                self.feedback.reset();
                true
            }
            Hit(cell) => match self.round.hit(cell) {
                Ok(update) => update.has_update(),
                Err(err) => {
                    log::error!("hit on cell {}: {}", cell, err);
                    false
                }
            },
            Timer(event) => {
                let update = self.round.handle(event);
                if update == RoundUpdate::Finished {
                    log::info!("round over, score {}", self.round.session().score());
                }
                update.has_update()
            }
            IdentityReady(Ok(identity)) => {
                log::debug!("signed in as {}", identity.uid);
                identity.local_save();
                self.identity = Some(identity);
                true
            }
            IdentityReady(Err(err)) => {
                log::error!("sign-in failed: {}", err);
                self.feedback.notice = Some(format!("could not sign in: {err}"));
                true
            }
            NameInput(name) => {
                self.feedback.player_name = name;
                self.feedback.name_error.take().is_some()
            }
            SubmitName => self.submit(ctx),
            Submitted(Ok((identity, outcome))) => {
                log::info!("submission: {}", outcome);
                identity.local_save();
                self.identity = Some(identity);
                self.feedback.submission = Submission::Done(outcome);
                self.leaderboard_refresh = self.leaderboard_refresh.wrapping_add(1);
                true
            }
            Submitted(Err(err)) => {
                log::error!("submission failed: {}", err);
                self.feedback.submission = Submission::Failed(err.to_string());
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let session = self.round.session();
        let playable = session.is_active();
        let grid = session.grid();
        let callback = ctx.link().callback(Msg::Hit);

        html! {
            <div class="whacabol" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <h1>{"Whac-a-bol"}</h1>
                if let Some(offline) = &self.offline {
                    <p class="error">{offline.clone()}</p>
                }
                if let Some(notice) = &self.feedback.notice {
                    <p class="error">{notice.clone()}</p>
                }
                <nav>
                    <aside class="score">{format!("Score: {}", session.score())}</aside>
                    <aside class="time">{format!("Time: {}", session.remaining())}</aside>
                </nav>
                {self.view_controls(ctx)}
                <table class={playable.then_some("playable")}>
                    {
                        for (0..game::GRID_ROWS).map(|row| html! {
                            <tr>
                                {
                                    for (0..game::GRID_COLS).map(|col| {
                                        let cell = game::cell_index((row, col));
                                        let revealed = grid.is_revealed(cell);
                                        let callback = callback.clone();
                                        html! {
                                            <CellView {cell} {revealed} {playable} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                if !playable {
                    <LeaderboardView
                        backend={self.backend.clone()}
                        identity={self.identity.clone()}
                        refresh={self.leaderboard_refresh}
                    />
                }
            </div>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        self.round.teardown();
    }
}
