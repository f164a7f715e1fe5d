//! Helpers for inspecting emitted events.

use ad_protocol::agent_models::{AgentId, AgentStatus};
use ad_protocol::ipc::Event;
use tokio::sync::mpsc::UnboundedReceiver;

/// Everything currently queued on the channel.
pub fn drain(rx: &mut UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Generation carried by `event`, if it belongs to a run.
#[allow(dead_code)]
pub fn generation_of(event: &Event) -> Option<u64> {
    match event {
        Event::RunStarted { generation }
        | Event::RunTriggered { generation, .. }
        | Event::ProgressReceived { generation, .. }
        | Event::AgentStatusChanged { generation, .. }
        | Event::RunFinished { generation, .. }
        | Event::RunFailed { generation, .. }
        | Event::RunReset { generation } => Some(*generation),
        _ => None,
    }
}

/// Status changes of `agent` in emission order.
#[allow(dead_code)]
pub fn status_changes(events: &[Event], agent: AgentId) -> Vec<AgentStatus> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::AgentStatusChanged {
                agent: a, status, ..
            } if *a == agent => Some(*status),
            _ => None,
        })
        .collect()
}

/// Assert no agent ever moves backward within a generation.
#[allow(dead_code)]
pub fn assert_monotonic(events: &[Event]) {
    for agent in AgentId::ALL {
        let mut last: Option<(u64, AgentStatus)> = None;
        for event in events {
            if let Event::AgentStatusChanged {
                generation,
                agent: a,
                status,
            } = event
            {
                if *a != agent {
                    continue;
                }
                if let Some((prev_generation, prev_status)) = last {
                    if prev_generation == *generation {
                        assert!(
                            *status > prev_status,
                            "{agent} went from {prev_status} to {status} in generation {generation}"
                        );
                    }
                }
                last = Some((*generation, *status));
            }
        }
    }
}
