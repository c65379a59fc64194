//! A `BroadcastLink` fans a single send out to every bound port, all with
//! the same arrival time.

use std::cell::Cell;
use std::rc::Rc;

use desim::component;
use desim::link::BroadcastLink;
use desim::port::Port;
use desim::simulation::Simulator;

struct Sender {
    out: BroadcastLink<i32>,
}

component! {
    Sender {
        links { out: BroadcastLink<i32> }
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
fn both_receivers_get_the_broadcast_value() {
    let received_a = Rc::new(Cell::new(None));
    let received_b = Rc::new(Cell::new(None));

    let sender = Sender { out: BroadcastLink::new(1).unwrap() };
    let out = sender.out.clone();

    let receiver_a = Receiver { inbox: Port::new(), received: Rc::clone(&received_a) };
    let inbox_a = receiver_a.inbox.clone();

    let receiver_b = Receiver { inbox: Port::new(), received: Rc::clone(&received_b) };
    let inbox_b = receiver_b.inbox.clone();

    let mut sim = Simulator::new(0);
    sim.register(sender, "sender").unwrap();
    sim.register(receiver_a, "receiver_a").unwrap();
    sim.register(receiver_b, "receiver_b").unwrap();
    sim.connect(&out, &inbox_a).unwrap();
    sim.connect(&out, &inbox_b).unwrap();

    sim.run();

    assert_eq!(received_a.get(), Some(42));
    assert_eq!(received_b.get(), Some(42));
}
