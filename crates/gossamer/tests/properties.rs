//! Property tests over the channel state machine.

use gossamer_testkit::{channel_pair, exchange, send_confirmed};
use proptest::prelude::*;

proptest! {
    /// Whatever the interleaving of senders, both replicas end up with the
    /// same log in the same order.
    #[test]
    fn test_logs_converge_for_any_interleaving(
        from_a in proptest::collection::vec(any::<bool>(), 1..20)
    ) {
        let (mut a, mut b) = channel_pair("prop-interleave");
        for (i, from_a) in from_a.iter().enumerate() {
            let content = format!("payload-{i}");
            if *from_a {
                exchange(&mut a, &mut b, &content);
            } else {
                exchange(&mut b, &mut a, &content);
            }
        }
        prop_assert_eq!(a.local_log().entries(), b.local_log().entries());
    }

    /// Reordered delivery of a sender's chain still reproduces the sender's
    /// log, via buffering and sweeps.
    #[test]
    fn test_any_delivery_rotation_yields_the_senders_log(
        rotation in any::<usize>(),
        count in 1usize..8,
    ) {
        let (mut a, mut b) = channel_pair("prop-rotate");
        let mut messages: Vec<_> = (0..count)
            .map(|i| send_confirmed(&mut a, &format!("m-{i}")))
            .collect();
        messages.rotate_left(rotation % count);

        for message in messages {
            b.receive_message(message);
        }
        for _ in 0..count {
            b.sweep_incoming_buffer();
        }

        prop_assert_eq!(b.incoming_len(), 0);
        prop_assert_eq!(a.local_log().entries(), b.local_log().entries());
    }
}
