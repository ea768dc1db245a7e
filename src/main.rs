#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rtic::app;

use lines_watch::{HourFormat, RenderPlan, WallClock, WatchFace};

/// Time shown after power-up, until set with the button
const INITIAL_TIME: (u8, u8, u8) = (12, 0, 0);

/// Panel SPI clock; the memory LCD tops out around 1 MHz
const LCD_BAUD_HZ: u32 = 1_000_000;

/// Re-derives the face from the wall clock and queues the changed regions.
fn resample(clock: &WallClock, face: &mut WatchFace, dirty: &mut RenderPlan, format: HourFormat) {
    match face.on_minute_tick(clock.hours(), clock.minutes(), format) {
        Ok(plan) => dirty.merge(&plan),
        Err(e) => defmt::error!("resample failed: {}", e),
    }
}

#[app(device = rp_pico::hal::pac, peripherals = true, dispatchers = [I2C0_IRQ])]
mod app {
    use super::*;
    use embedded_hal::digital::v2::{InputPin, ToggleableOutputPin};
    use lines_watch::MemoryLcd;
    use rtic::mutex_prelude::*;
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::{ExtU32, RateExtU32},
        gpio::{
            bank0::{Gpio14, Gpio15, Gpio16, Gpio17, Gpio18, Gpio19, Gpio25},
            FunctionSio, FunctionSpi, Interrupt, Pin, PullDown, PullUp, SioInput, SioOutput,
        },
        sio::Sio,
        spi::{Enabled, Spi},
        timer::{Alarm, Alarm0, Alarm1, Timer},
        watchdog::Watchdog,
    };

    type Spi0 = Spi<
        Enabled,
        rp_pico::hal::pac::SPI0,
        (
            Pin<Gpio19, FunctionSpi, PullDown>,
            Pin<Gpio16, FunctionSpi, PullDown>,
            Pin<Gpio18, FunctionSpi, PullDown>,
        ),
    >;
    type CsPin = Pin<Gpio17, FunctionSio<SioOutput>, PullDown>;
    type Lcd = MemoryLcd<Spi0, CsPin>;
    type InputPullUp<P> = Pin<P, FunctionSio<SioInput>, PullUp>;

    #[shared]
    struct Shared {
        clock: WallClock,
        face: WatchFace,
        format: HourFormat,
        dirty: RenderPlan,
        lcd: Lcd,
        button: InputPullUp<Gpio15>,
        alarm1: Alarm1,
        repeat_delay: u32,
    }

    #[local]
    struct Local {
        led: Pin<Gpio25, FunctionSio<SioOutput>, PullDown>,
        alarm: Alarm0,
        // Jumper to ground selects the 24-hour display
        format_strap: InputPullUp<Gpio14>,
    }

    fn read_format(strap: &InputPullUp<Gpio14>) -> HourFormat {
        HourFormat::from_24h_style(strap.is_low().unwrap_or(false))
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let mut alarm = timer.alarm_0().unwrap();
        // First tick in 1 second
        alarm.schedule(1_000_000u32.micros()).unwrap();
        alarm.enable_interrupt();

        let mut alarm1 = timer.alarm_1().unwrap();
        alarm1.enable_interrupt();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let led = pins.led.into_push_pull_output();
        let button = pins.gpio15.into_pull_up_input();
        button.set_interrupt_enabled(Interrupt::EdgeLow, true);
        let format_strap = pins.gpio14.into_pull_up_input();

        let mosi = pins.gpio19.into_function::<FunctionSpi>();
        let miso = pins.gpio16.into_function::<FunctionSpi>();
        let sck = pins.gpio18.into_function::<FunctionSpi>();
        let cs = pins.gpio17.into_push_pull_output();

        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, miso, sck));
        let spi = spi.init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            LCD_BAUD_HZ.Hz(),
            &embedded_hal::spi::MODE_0,
        );

        let mut lcd = MemoryLcd::new(spi, cs).unwrap();
        lcd.clear_display().unwrap();

        let (hours, mins, secs) = INITIAL_TIME;
        let clock = WallClock::new(hours, mins, secs).unwrap();
        let format = read_format(&format_strap);
        let (face, dirty) = WatchFace::on_init(clock.hours(), clock.minutes(), format).unwrap();
        defmt::info!(
            "watch face up at {=u8}:{=u8} ({})",
            clock.hours(),
            clock.minutes(),
            format
        );

        paint::spawn().ok();

        (
            Shared {
                clock,
                face,
                format,
                dirty,
                lcd,
                button,
                alarm1,
                repeat_delay: 500_000,
            },
            Local {
                led,
                alarm,
                format_strap,
            },
            init::Monotonics(),
        )
    }

    // 1 Hz: keeps time and alternates the panel's VCOM
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [clock, face, format, dirty, lcd], local = [alarm, led, format_strap])]
    fn timer_tick(ctx: timer_tick::Context) {
        ctx.local.alarm.clear_interrupt();
        ctx.local.alarm.schedule(1_000_000u32.micros()).unwrap();

        ctx.local.led.toggle().unwrap();

        let timer_tick::SharedResources {
            mut clock,
            mut face,
            mut format,
            mut dirty,
            mut lcd,
            ..
        } = ctx.shared;

        lcd.lock(|lcd| {
            if let Err(e) = lcd.toggle_vcom() {
                defmt::warn!("vcom toggle failed: {}", e);
            }
        });

        let strap = read_format(ctx.local.format_strap);
        format.lock(|f| *f = strap);

        if clock.lock(|c| c.tick()) {
            (&mut clock, &mut face, &mut dirty).lock(|clock, face, dirty| {
                defmt::debug!("minute tick {=u8}:{=u8}", clock.hours(), clock.minutes());
                resample(clock, face, dirty, strap);
            });
            paint::spawn().ok();
        }
    }

    // Button press: advance the time by one minute, then auto-repeat while held
    #[task(binds = IO_IRQ_BANK0, priority = 1, shared = [clock, face, format, dirty, button, alarm1, repeat_delay])]
    fn button_press(ctx: button_press::Context) {
        let button_press::SharedResources {
            mut clock,
            mut face,
            mut format,
            mut dirty,
            mut button,
            mut alarm1,
            mut repeat_delay,
            ..
        } = ctx.shared;

        // Disable interrupt to prevent bouncing re-entry
        button.lock(|b| {
            b.set_interrupt_enabled(Interrupt::EdgeLow, false);
            b.clear_interrupt(Interrupt::EdgeLow);
        });

        let format = format.lock(|f| *f);
        (&mut clock, &mut face, &mut dirty).lock(|clock, face, dirty| {
            clock.add_minute();
            defmt::info!("time set to {=u8}:{=u8}", clock.hours(), clock.minutes());
            resample(clock, face, dirty, format);
        });
        paint::spawn().ok();

        let delay = 500_000;
        repeat_delay.lock(|d| *d = delay);
        alarm1.lock(|a| {
            a.clear_interrupt();
            a.schedule(delay.micros()).ok();
        });
    }

    // Held button: repeat with 20% shorter delay each step, down to 20 ms
    #[task(binds = TIMER_IRQ_1, priority = 1, shared = [clock, face, format, dirty, button, alarm1, repeat_delay])]
    fn button_repeat(ctx: button_repeat::Context) {
        let button_repeat::SharedResources {
            mut clock,
            mut face,
            mut format,
            mut dirty,
            mut button,
            mut alarm1,
            mut repeat_delay,
            ..
        } = ctx.shared;

        alarm1.lock(|a| a.clear_interrupt());

        let is_held = button.lock(|b| b.is_low().unwrap_or(false));
        if !is_held {
            button.lock(|b| {
                // Drop edges latched while bouncing
                b.clear_interrupt(Interrupt::EdgeLow);
                b.set_interrupt_enabled(Interrupt::EdgeLow, true);
            });
            return;
        }

        let format = format.lock(|f| *f);
        (&mut clock, &mut face, &mut dirty).lock(|clock, face, dirty| {
            clock.add_minute();
            resample(clock, face, dirty, format);
        });
        paint::spawn().ok();

        let delay = repeat_delay.lock(|d| {
            *d = (*d as u64 * 8 / 10).max(20_000) as u32;
            *d
        });
        alarm1.lock(|a| {
            a.schedule(delay.micros()).ok();
        });
    }

    // Paints every queued region into the frame buffer and pushes changed lines
    #[task(shared = [face, dirty, lcd])]
    fn paint(ctx: paint::Context) {
        let paint::SharedResources { face, dirty, lcd, .. } = ctx.shared;
        (face, dirty, lcd).lock(|face, dirty, lcd| {
            if dirty.is_empty() {
                return;
            }
            face.paint_plan(dirty, lcd).unwrap_or_else(|e| match e {});
            dirty.clear();
            if let Err(e) = lcd.flush() {
                defmt::warn!("lcd flush failed: {}", e);
            }
        });
    }
}
