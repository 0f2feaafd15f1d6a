use crate::state::HubState;
use axum::{
    extract::State,
    response::{
        Sse,
        sse::{Event, KeepAlive},
    },
};
use futures::Stream;
use std::convert::Infallible;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseEvent {
    ///The first load finished, successfully or not.
    StudentsLoaded,
    CrudStudent,
}

impl SseEvent {
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::StudentsLoaded => "students_loaded",
            Self::CrudStudent => "crud_student",
        }
    }
}

pub async fn sse_feed(
    State(state): State<HubState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    //lagged receivers just skip what they missed, the next event refreshes everything anyway
    let stream = BroadcastStream::new(state.subscribe_to_sse_feed())
        .filter_map(Result::ok)
        .map(|event| {
            Ok(Event::default()
                .event(event.event_name())
                .data(event.event_name()))
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
