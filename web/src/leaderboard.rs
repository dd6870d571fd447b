use crate::backend::{Backend, BackendError};
use gloo::timers::callback::Interval;
use whacabol_protocol::auth::Identity;
use whacabol_protocol::{LEADERBOARD_SIZE, LeaderboardEntry, ScoreStore};
use yew::prelude::*;

const POLL_INTERVAL_MILLIS: u32 = 10_000;

/// Orders overlapping requests so a slow response never replaces a newer one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct RequestSeq {
    issued: u64,
    applied: u64,
}

impl RequestSeq {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn accept(&mut self, request: u64) -> bool {
        if request <= self.applied {
            return false;
        }
        self.applied = request;
        true
    }
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct LeaderboardProps {
    pub backend: Option<Backend>,
    pub identity: Option<Identity>,
    /// Bumped by the parent to ask for an immediate reload.
    #[prop_or_default]
    pub refresh: u32,
}

#[derive(Debug)]
pub(crate) enum Msg {
    Poll,
    Loaded {
        request: u64,
        result: Result<Vec<LeaderboardEntry>, BackendError>,
    },
}

pub(crate) struct LeaderboardView {
    entries: Vec<LeaderboardEntry>,
    error: Option<String>,
    requests: RequestSeq,
    _poll: Option<Interval>,
}

impl LeaderboardView {
    fn poll(&mut self, ctx: &Context<Self>) {
        let props = ctx.props();
        let Some(backend) = props.backend.as_ref() else {
            return;
        };

        let store = backend.store(props.identity.as_ref());
        let request = self.requests.issue();
        log::trace!("leaderboard request {}", request);
        ctx.link().send_future(async move {
            let result = store.top(LEADERBOARD_SIZE).await;
            Msg::Loaded { request, result }
        });
    }
}

impl Component for LeaderboardView {
    type Message = Msg;
    type Properties = LeaderboardProps;

    fn create(ctx: &Context<Self>) -> Self {
        let poll = ctx.props().backend.is_some().then(|| {
            let link = ctx.link().clone();
            Interval::new(POLL_INTERVAL_MILLIS, move || link.send_message(Msg::Poll))
        });
        ctx.link().send_message(Msg::Poll);

        Self {
            entries: Vec::new(),
            error: None,
            requests: RequestSeq::default(),
            _poll: poll,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Poll => {
                self.poll(ctx);
                false
            }
            Msg::Loaded { request, result } => {
                if !self.requests.accept(request) {
                    log::debug!("dropping stale leaderboard response {}", request);
                    return false;
                }
                match result {
                    Ok(entries) => {
                        let updated = self.entries != entries || self.error.is_some();
                        self.entries = entries;
                        self.error = None;
                        updated
                    }
                    Err(err) => {
                        log::warn!("leaderboard load failed: {}", err);
                        self.error = Some(format!("could not load leaderboard: {err}"));
                        true
                    }
                }
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props() != old_props {
            self.poll(ctx);
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let own_uid = props.identity.as_ref().map(|identity| identity.uid.as_str());

        html! {
            <section class="leaderboard">
                <h2>{"Leaderboard"}</h2>
                if props.backend.is_none() {
                    <p class="status">{"Leaderboard offline"}</p>
                }
                if let Some(err) = &self.error {
                    <p class="error">{err.clone()}</p>
                }
                if self.entries.is_empty() && self.error.is_none() && props.backend.is_some() {
                    <p class="status">{"No scores yet"}</p>
                }
                <ol>
                    {
                        for self.entries.iter().map(|entry| {
                            let class = classes!((Some(entry.uid.as_str()) == own_uid).then_some("own"));
                            html! {
                                <li key={entry.uid.clone()} {class}>
                                    <span class="name">{entry.name.clone()}</span>
                                    <span class="score">{entry.score}</span>
                                </li>
                            }
                        })
                    }
                </ol>
            </section>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn older_responses_are_dropped() {
        let mut requests = RequestSeq::default();
        let first = requests.issue();
        let second = requests.issue();

        assert!(requests.accept(second));
        assert!(!requests.accept(first));
    }

    #[test]
    fn responses_in_order_are_applied() {
        let mut requests = RequestSeq::default();
        let first = requests.issue();
        assert!(requests.accept(first));
        let second = requests.issue();
        assert!(requests.accept(second));
        assert!(!requests.accept(second));
    }
}
