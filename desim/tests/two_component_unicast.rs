//! A value sent from one component arrives, unchanged, at another
//! component's port one tick later.

use std::cell::Cell;
use std::rc::Rc;

use desim::component;
use desim::link::Link;
use desim::port::Port;
use desim::simulation::Simulator;
use desim::time::SimulationTime;

struct Sender {
    out: Link<i32>,
}

component! {
    Sender {
        links { out: Link<i32> }
        startup(sim) {
            self.out.send(sim, 42, 0).unwrap();
        }
    }
}

struct Receiver {
    inbox: Port<i32>,
    received: Rc<Cell<Option<i32>>>,
}

component! {
    Receiver {
        ports { inbox: Port<i32> }
        on_message(inbox, msg, _sim) {
            self.received.set(Some(msg));
        }
    }
}

#[test]
fn value_arrives_unchanged_one_tick_later() {
    let received = Rc::new(Cell::new(None));

    let sender = Sender { out: Link::new(1).unwrap() };
    let out = sender.out.clone();

    let receiver = Receiver { inbox: Port::new(), received: Rc::clone(&received) };
    let inbox = receiver.inbox.clone();

    let mut sim = Simulator::new(0);
    sim.register(sender, "sender").unwrap();
    sim.register(receiver, "receiver").unwrap();
    sim.connect(&out, &inbox).unwrap();

    sim.run();

    assert_eq!(received.get(), Some(42));
    assert_eq!(sim.current_time(), SimulationTime::new(1));
}
