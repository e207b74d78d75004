use std::time::{Duration, Instant};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time;
use tracing::{debug, info, warn};

use crate::command::{ActionId, CommandOutcome, dispatch};
use crate::error::AppResult;
use crate::event::DomainEvent;
use crate::media::PhotoWorker;

use super::actors::{UiActor, select_wake_timeout};
use super::core::App;
use super::event_bus::EventBusRuntime;
use super::terminal_session::TerminalSession;

struct LoopRuntime {
    idle_timeout: Duration,
    ui_actor: UiActor,
    session: TerminalSession,
    photo_worker: PhotoWorker,
    loop_event_tx: UnboundedSender<DomainEvent>,
    loop_event_rx: UnboundedReceiver<DomainEvent>,
    loop_event_runtime: EventBusRuntime,
}

enum WaitEvent {
    Event(DomainEvent),
    Closed,
}

enum LoopControl {
    Continue,
    Break,
}

impl App {
    pub async fn run(&mut self) -> AppResult<()> {
        let mut runtime = self.initialize_loop_runtime()?;

        let result = self.drive(&mut runtime).await;

        runtime.loop_event_runtime.shutdown();
        runtime.session.restore()?;
        info!(
            photos_requested = self.state.photos.requested,
            photos_decoded = self.state.photos.decoded,
            photos_failed = self.state.photos.failed,
            photo_cache_evictions = self.photos.cache.counters().evictions,
            "viewer closed"
        );
        result
    }

    async fn drive(&mut self, runtime: &mut LoopRuntime) -> AppResult<()> {
        loop {
            self.update_and_render_frame(runtime)?;

            let now = self.now();
            let wake_timeout = select_wake_timeout(
                now,
                self.next_deadline(),
                self.is_animating(),
                runtime.ui_actor.frame_interval(),
                runtime.idle_timeout,
            );
            let waited = wait_next_event(
                &mut runtime.loop_event_rx,
                &mut runtime.photo_worker,
                wake_timeout,
            )
            .await;
            if matches!(
                self.handle_waited_event(waited, runtime)?,
                LoopControl::Break
            ) {
                return Ok(());
            }
        }
    }

    fn initialize_loop_runtime(&mut self) -> AppResult<LoopRuntime> {
        let frame_interval = Duration::from_millis(self.config.render.tick_ms);
        let idle_timeout = Duration::from_millis(self.config.render.input_poll_timeout_ms);
        let ui_actor = UiActor::new(Instant::now(), frame_interval);

        let session = TerminalSession::enter()?;
        self.photos.presenter.initialize_terminal();
        let photo_worker = PhotoWorker::spawn(
            self.photos.source.clone(),
            self.config.render.photo_worker_threads,
        )?;
        let (loop_event_tx, loop_event_rx, loop_event_runtime) = EventBusRuntime::spawn();
        debug!(
            protocol = self.photos.presenter.protocol_label(),
            tick_ms = self.config.render.tick_ms,
            "event loop started"
        );

        Ok(LoopRuntime {
            idle_timeout,
            ui_actor,
            session,
            photo_worker,
            loop_event_tx,
            loop_event_rx,
            loop_event_runtime,
        })
    }

    /// Runs due continuations, keeps the controller's viewport and fit in
    /// step with the terminal, and draws when anything changed.
    fn update_and_render_frame(&mut self, runtime: &mut LoopRuntime) -> AppResult<()> {
        let now = self.now();
        let mut fit_requested = false;
        if let Some(book) = self.book.as_mut() {
            let advanced = book.advance(now);
            if advanced.changed {
                runtime.ui_actor.mark_redraw();
            }
            fit_requested = advanced.fit_requested;
        }

        let plan = self.plan_frame(&runtime.session)?;
        if plan.resized {
            runtime.ui_actor.mark_redraw();
        }
        if fit_requested {
            self.run_content_fit(&plan);
            runtime.ui_actor.mark_redraw();
        }

        if self.request_visible_photos(&plan, &mut runtime.photo_worker) {
            runtime.ui_actor.mark_redraw();
        }
        if runtime
            .ui_actor
            .should_request_animation_frame(self.is_animating())
        {
            runtime.ui_actor.mark_redraw();
        }

        if runtime.ui_actor.needs_redraw() {
            self.render_frame(
                &mut runtime.session,
                &plan,
                runtime.photo_worker.in_flight_len(),
            )?;
            runtime.ui_actor.clear_redraw();
        }
        Ok(())
    }

    fn handle_waited_event(
        &mut self,
        waited: WaitEvent,
        runtime: &mut LoopRuntime,
    ) -> AppResult<LoopControl> {
        match waited {
            WaitEvent::Event(DomainEvent::Input(event)) => {
                let outcome = self.handle_input_event(event, &mut runtime.session)?;
                if outcome.redraw {
                    runtime.ui_actor.mark_redraw();
                }
                if let Some(command) = outcome.command {
                    let _ = runtime.loop_event_tx.send(DomainEvent::Command(command));
                }
            }
            WaitEvent::Event(DomainEvent::InputError(message)) => {
                warn!(error = %message, "input stream error");
                self.state.status.last_action_id = Some(ActionId::Input);
                self.state.status.message = format!("input error: {message}");
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::Command(command)) => {
                let now = self.now();
                let result = dispatch(&mut self.state, self.book.as_mut(), command, now);
                for event in result.emitted_events {
                    let _ = runtime.loop_event_tx.send(DomainEvent::App(event));
                }
                match result.outcome {
                    CommandOutcome::QuitRequested => return Ok(LoopControl::Break),
                    CommandOutcome::Applied | CommandOutcome::Noop => {
                        runtime.ui_actor.mark_redraw()
                    }
                }
            }
            WaitEvent::Event(DomainEvent::App(event)) => {
                self.handle_app_event(&event);
            }
            WaitEvent::Event(DomainEvent::PhotoReady(completed)) => {
                self.apply_photo_result(completed);
                runtime.ui_actor.mark_redraw();
            }
            WaitEvent::Event(DomainEvent::Wake) => {}
            WaitEvent::Closed => return Ok(LoopControl::Break),
        }
        Ok(LoopControl::Continue)
    }
}

async fn wait_next_event(
    loop_event_rx: &mut UnboundedReceiver<DomainEvent>,
    photo_worker: &mut PhotoWorker,
    wake_timeout: Duration,
) -> WaitEvent {
    tokio::select! {
        biased;
        maybe_loop = loop_event_rx.recv() => {
            match maybe_loop {
                Some(event) => WaitEvent::Event(event),
                None => WaitEvent::Closed,
            }
        },
        Some(result) = photo_worker.recv_result() => {
            WaitEvent::Event(DomainEvent::PhotoReady(result))
        },
        _ = time::sleep(wake_timeout) => {
            WaitEvent::Event(DomainEvent::Wake)
        }
    }
}
