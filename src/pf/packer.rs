//! # IR Payload Packer
//!
//! Repacks a logical Power Functions command into the 2-byte payload the
//! hub's IR transmitter mode expects.
//!
//! ```text
//! Logical:  byte0 = [n1 | n2]   byte1 = [n3 | 0]
//! Physical: byte0 = [n2 | n3]   byte1 = [0  | n1]
//! ```

use super::command::PfCommand;

/// Size of the physical IR payload
pub const PF_IR_PAYLOAD_SIZE: usize = 2;

/// Pack a logical command into the transmitter payload
///
/// Operates on the bytes only and knows nothing about channels or power.
///
/// # Examples
///
/// ```
/// use hub_sensors::pf::command::{single_output, PfOutput};
/// use hub_sensors::pf::packer::pack;
///
/// let payload = pack(single_output(1, PfOutput::Red, 7));
/// assert_eq!(payload, [0x47, 0x00]);
/// ```
pub fn pack(cmd: PfCommand) -> [u8; PF_IR_PAYLOAD_SIZE] {
    [(cmd.byte0 << 4).wrapping_add(cmd.byte1 >> 4), cmd.byte0 >> 4]
}
