//! The declarative behavior-binding layer.
//!
//! [`component!`] replaces a compile-time field walk and dynamically
//! dispatched `tick`/`next_wake` overrides with a declarative macro: it
//! expands a declarative list of a struct's ports, links and timers, plus
//! `startup`/`shutdown`/`on_message`/`on_timer` bodies, into a single
//! `impl Component for $ty` block.

/// Generates a [`Component`](crate::component::Component) implementation for
/// a concrete component type from a declarative description of its ports,
/// links, timers, and message handlers.
///
/// ```ignore
/// component! {
///     MyComponent {
///         ports { inbox: Port<Msg> }
///         links { out: Link<Msg> }
///         timers { alarm: Timer<Msg> }
///         vec_links { fanout: Vec<Link<Msg>> }
///         startup(sim) { self.out.send(sim, Msg::Hello, 0).unwrap(); }
///         shutdown(sim) { let _ = sim; }
///         on_message(inbox, msg, sim) { let _ = (msg, sim); }
///         on_timer(alarm, msg, sim) { let _ = (msg, sim); }
///     }
/// }
/// ```
///
/// Any of `ports`, `links`, `timers`, `vec_ports`, `vec_links`,
/// `vec_timers`, `startup`, `shutdown` may be omitted (an empty `{}` body is
/// also accepted); `on_message` and `on_timer` entries may repeat any
/// number of times, once per handled port or timer.
///
/// The generated implementation works as follows:
/// `next_wake` folds `peek_time()` over every listed port/timer field
/// (recursing into `vec_*` fields) starting from `NO_EVENT`; `tick` drains
/// nothing during `startup`/`shutdown`; `on_message`/`on_timer` bodies see
/// `sim.current_time()` captured once at tick entry, so a (currently
/// impossible, since latency is always `>= 1`) mid-tick send could never
/// change which messages are drained.
#[macro_export]
macro_rules! component {
    (
        $ty:ty {
            $(ports { $($port_field:ident : $port_ty:ty),* $(,)? })?
            $(links { $($link_field:ident : $link_ty:ty),* $(,)? })?
            $(timers { $($timer_field:ident : $timer_ty:ty),* $(,)? })?
            $(vec_ports { $($vec_port_field:ident : $vec_port_ty:ty),* $(,)? })?
            $(vec_links { $($vec_link_field:ident : $vec_link_ty:ty),* $(,)? })?
            $(vec_timers { $($vec_timer_field:ident : $vec_timer_ty:ty),* $(,)? })?
            $(startup($startup_sim:ident) $startup_body:block)?
            $(shutdown($shutdown_sim:ident) $shutdown_body:block)?
            $( on_message($on_msg_field:ident, $on_msg_bind:pat, $on_msg_sim:ident) $on_msg_body:block )*
            $( on_timer($on_timer_field:ident, $on_timer_bind:pat, $on_timer_sim:ident) $on_timer_body:block )*
        }
    ) => {
        impl $crate::component::Component for $ty {
            fn register_endpoints(&mut self, id: $crate::component::EndpointId) {
                $($(
                    $crate::component::Endpoint::bind(&mut self.$port_field, id);
                )*)?
                $($(
                    $crate::component::Endpoint::bind(&mut self.$link_field, id);
                )*)?
                $($(
                    $crate::component::Endpoint::bind(&mut self.$timer_field, id);
                )*)?
                $($(
                    for endpoint in self.$vec_port_field.iter_mut() {
                        $crate::component::Endpoint::bind(endpoint, id);
                    }
                )*)?
                $($(
                    for endpoint in self.$vec_link_field.iter_mut() {
                        $crate::component::Endpoint::bind(endpoint, id);
                    }
                )*)?
                $($(
                    for endpoint in self.$vec_timer_field.iter_mut() {
                        $crate::component::Endpoint::bind(endpoint, id);
                    }
                )*)?
            }

            fn next_wake(&self) -> $crate::time::SimulationTime {
                let mut wake = $crate::time::NO_EVENT;
                $($(
                    wake = wake.earliest(self.$port_field.peek_time());
                )*)?
                $($(
                    wake = wake.earliest(self.$timer_field.peek_time());
                )*)?
                $($(
                    for endpoint in self.$vec_port_field.iter() {
                        wake = wake.earliest(endpoint.peek_time());
                    }
                )*)?
                $($(
                    for endpoint in self.$vec_timer_field.iter() {
                        wake = wake.earliest(endpoint.peek_time());
                    }
                )*)?
                wake
            }

            fn tick(
                &mut self,
                cx: &$crate::component::TickContext,
                is_startup: bool,
                is_shutdown: bool,
            ) {
                if is_startup {
                    $(
                        let $startup_sim = cx;
                        $startup_body
                    )?
                    return;
                }
                if is_shutdown {
                    $(
                        let $shutdown_sim = cx;
                        $shutdown_body
                    )?
                    return;
                }
                let current_time = cx.current_time();
                $(
                    for $on_msg_bind in self.$on_msg_field.drain_at(current_time) {
                        let $on_msg_sim = cx;
                        $on_msg_body
                    }
                )*
                $(
                    for $on_timer_bind in self.$on_timer_field.drain_at(current_time) {
                        let $on_timer_sim = cx;
                        $on_timer_body
                    }
                )*
            }
        }
    };
}
