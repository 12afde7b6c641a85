//! # Power Functions Command Builder
//!
//! Builds logical 2-byte Power Functions commands.
//!
//! ## Logical Layout
//!
//! ```text
//! Byte 0: [ channel/address nibble | mode nibble ]
//! Byte 1: [ data nibble            | 0 (LRC slot) ]
//! ```
//!
//! Only the first three nibbles are meaningful; the fourth must stay zero.
//! The transmitter fills in the toggle bit and checksum itself.
//!
//! Channels 5-8 address the second receiver address and only work once the
//! receiver has been switched into extended channel mode. Receiver state is
//! not tracked here.
//!
//! Builders never validate their inputs. Out-of-range channels or powers
//! wrap in byte arithmetic exactly as the receiver protocol tolerates.

use serde::{Deserialize, Serialize};

use crate::sensor::scaler::power_to_nibble;

/// Second byte of the "extended toggle address" command
pub const PF_EXTENDED_TOGGLE_ADDRESS: u8 = 6;

/// Mode nibble for single output mode, output A (red)
pub const PF_SINGLE_OUTPUT_RED: u8 = 4;

/// Mode nibble for single output mode, output B (blue)
pub const PF_SINGLE_OUTPUT_BLUE: u8 = 5;

/// Offset added to the channel index to select combo PWM mode
pub const PF_COMBO_PWM_OFFSET: u8 = 4;

/// Power level that brakes the motor
pub const PF_POWER_BRAKE: i8 = 8;

/// Full forward power
pub const PF_POWER_MAX: i8 = 7;

/// Full reverse power
pub const PF_POWER_MIN: i8 = -7;

/// Output port on a Power Functions receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PfOutput {
    /// Output A
    Red,
    /// Output B
    Blue,
}

impl PfOutput {
    fn mode_nibble(self) -> u8 {
        match self {
            PfOutput::Red => PF_SINGLE_OUTPUT_RED,
            PfOutput::Blue => PF_SINGLE_OUTPUT_BLUE,
        }
    }
}

/// Logical Power Functions command, before transmitter repacking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PfCommand {
    pub byte0: u8,
    pub byte1: u8,
}

impl PfCommand {
    /// Wrap an already-built logical command
    ///
    /// The low nibble of `bytes[1]` must be zero.
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self {
            byte0: bytes[0],
            byte1: bytes[1],
        }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        [self.byte0, self.byte1]
    }
}

/// Split for the extended toggle command: channels 4 and up move to address 1
fn split_extended_channel(channel: u8) -> (u8, u8) {
    if channel >= 4 {
        (channel.wrapping_sub(4), 1)
    } else {
        (channel, 0)
    }
}

/// Split for output commands: channels above 4 move to address 1
fn split_channel(channel: u8) -> (u8, u8) {
    if channel > 4 {
        (channel.wrapping_sub(4), 1)
    } else {
        (channel, 0)
    }
}

/// Build an "extended toggle address" command
///
/// Switches the receiver on `channel` into extended channel mode. Sending it
/// for channels 5-8 switches extended mode back off.
///
/// Channel 4 already counts as the second address here, unlike
/// [`single_output`] and [`combo_pwm`].
///
/// # Examples
///
/// ```
/// use hub_sensors::pf::command::extended_channel;
///
/// let cmd = extended_channel(5);
/// assert_eq!(cmd.to_bytes(), [0x08, 0x06]);
/// ```
pub fn extended_channel(channel: u8) -> PfCommand {
    let (index, address) = split_extended_channel(channel);

    PfCommand {
        byte0: (index.wrapping_sub(1) << 4).wrapping_add(address << 3),
        byte1: PF_EXTENDED_TOGGLE_ADDRESS,
    }
}

/// Build a single output mode command
///
/// # Arguments
///
/// * `channel` - Channel number, 1-8
/// * `output` - Receiver output (red = A, blue = B)
/// * `power` - -7 (full reverse) to 7 (full forward), 0 stops, 8 brakes
pub fn single_output(channel: u8, output: PfOutput, power: i8) -> PfCommand {
    let (index, address) = split_channel(channel);

    PfCommand {
        byte0: (index.wrapping_sub(1) << 4)
            .wrapping_add(address << 3)
            .wrapping_add(output.mode_nibble()),
        byte1: power_to_nibble(power) << 4,
    }
}

/// Build a combo PWM command driving both outputs at once
///
/// Designed for bang-bang operation: the receiver stops the motors when it
/// loses sight of the transmitter.
///
/// # Arguments
///
/// * `channel` - Channel number, 1-8
/// * `power_a` - Power for the red output
/// * `power_b` - Power for the blue output
pub fn combo_pwm(channel: u8, power_a: i8, power_b: i8) -> PfCommand {
    let (index, address) = split_channel(channel);

    let selector = index
        .wrapping_sub(1)
        .wrapping_add(PF_COMBO_PWM_OFFSET)
        .wrapping_add(address << 3);

    PfCommand {
        byte0: (selector << 4).wrapping_add(power_to_nibble(power_a)),
        byte1: power_to_nibble(power_b) << 4,
    }
}
