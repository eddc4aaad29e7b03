//! Attenuator firmware for nRF52840.
//!
//! Three tasks:
//!
//! - **control** - polls the switches and dial every `LOOP_TICK_MS` and
//!   runs one [`Attenuator::tick`]
//! - **pack_tx** - drains the command queue onto the UARTE
//! - **pack_rx** - decodes pack frames and hands them to the control task
//!
//! The control task never awaits anything but its own ticker, so the
//! dial keeps its timing while the UARTE is busy.

#![no_std]
#![no_main]

use attenuator::bargraph::BargraphState;
use attenuator::config::{self, AttenuatorConfig, COMMAND_QUEUE_DEPTH};
use attenuator::dial::DialTick;
use attenuator::error::Error;
use attenuator::link::{self, FrameReader, PackMessage};
use attenuator::{Attenuator, Command, CommandSink, RawInputs};
use defmt::{debug, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::uarte::{self, UarteRx, UarteTx};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_time::{Duration, Instant, Ticker};
use embedded_hal::digital::InputPin;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    UARTE0 => uarte::InterruptHandler<peripherals::UARTE0>;
});

static COMMANDS: Channel<CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH> = Channel::new();
static PACK_MESSAGES: Channel<CriticalSectionRawMutex, PackMessage, 8> = Channel::new();

/// Fire-and-forget sink onto the UARTE command queue.
struct QueueSink(Sender<'static, CriticalSectionRawMutex, Command, COMMAND_QUEUE_DEPTH>);

impl CommandSink for QueueSink {
    fn send(&mut self, cmd: Command) {
        if self.0.try_send(cmd).is_err() {
            warn!("{:?}: dropped {:?}", Error::ChannelFull, cmd);
        }
    }
}

/// Active-low with pull-up: engaged when the line reads low.
fn engaged<P: InputPin>(pin: &mut P) -> bool {
    pin.is_low().unwrap_or(false)
}

struct Controls {
    center: Input<'static>,
    left_toggle: Input<'static>,
    right_toggle: Input<'static>,
    encoder_a: Input<'static>,
    encoder_b: Input<'static>,
}

impl Controls {
    fn read(&mut self) -> RawInputs {
        RawInputs {
            center: engaged(&mut self.center),
            left_toggle: engaged(&mut self.left_toggle),
            right_toggle: engaged(&mut self.right_toggle),
            encoder_a: self.encoder_a.is_high(),
            encoder_b: self.encoder_b.is_high(),
        }
    }
}

fn baudrate() -> uarte::Baudrate {
    match config::PACK_BAUD {
        115_200 => uarte::Baudrate::BAUD115200,
        57_600 => uarte::Baudrate::BAUD57600,
        _ => uarte::Baudrate::BAUD9600,
    }
}

#[embassy_executor::task]
async fn control_task(mut controls: Controls, mut led: Output<'static>) -> ! {
    let boot = controls.read();
    let mut attenuator = Attenuator::new(
        AttenuatorConfig::default(),
        BargraphState::new(),
        &boot,
        Instant::now().as_millis(),
    );
    let mut sink = QueueSink(COMMANDS.sender());
    let mut ticker = Ticker::every(Duration::from_millis(config::LOOP_TICK_MS));

    info!("Control loop started");

    loop {
        let now = Instant::now().as_millis();

        while let Ok(msg) = PACK_MESSAGES.try_receive() {
            attenuator.receive(msg, now);
        }

        let raw = controls.read();
        let tick = attenuator.tick(&raw, now, &mut sink);
        if tick != DialTick::IDLE {
            debug!("Dial: {:?}", tick);
        }

        if attenuator.status_led() {
            led.set_high();
        } else {
            led.set_low();
        }

        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn pack_tx_task(mut tx: UarteTx<'static, peripherals::UARTE0>) -> ! {
    loop {
        let cmd = COMMANDS.receive().await;
        let frame = link::encode_command(cmd);
        if tx.write(&frame).await.is_err() {
            warn!("{:?}: failed to send {:?}", Error::Serial, cmd);
        }
    }
}

#[embassy_executor::task]
async fn pack_rx_task(mut rx: UarteRx<'static, peripherals::UARTE0>) -> ! {
    let mut reader = FrameReader::new();
    let mut byte = [0u8; 1];

    loop {
        if rx.read(&mut byte).await.is_err() {
            warn!("{:?}: read failed", Error::Serial);
            continue;
        }

        match reader.push(byte[0]) {
            Some(Ok(msg)) => {
                if PACK_MESSAGES.try_send(msg).is_err() {
                    warn!("Pack message dropped: {:?}", msg);
                }
            }
            Some(Err(e)) => warn!("Pack frame rejected: {:?}", Error::from(e)),
            None => {}
        }
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("attenuator starting");

    let controls = Controls {
        left_toggle: Input::new(p.P0_11, Pull::Up),
        right_toggle: Input::new(p.P0_12, Pull::Up),
        center: Input::new(p.P0_24, Pull::Up),
        encoder_a: Input::new(p.P0_25, Pull::Up),
        encoder_b: Input::new(p.P1_00, Pull::Up),
    };
    let led = Output::new(p.P0_13, Level::High, OutputDrive::Standard);

    let mut uart_config = uarte::Config::default();
    uart_config.parity = uarte::Parity::EXCLUDED;
    uart_config.baudrate = baudrate();
    let uart = uarte::Uarte::new(p.UARTE0, Irqs, p.P0_08, p.P0_06, uart_config);
    let (tx, rx) = uart.split();

    unwrap!(spawner.spawn(pack_tx_task(tx)));
    unwrap!(spawner.spawn(pack_rx_task(rx)));
    unwrap!(spawner.spawn(control_task(controls, led)));
}
