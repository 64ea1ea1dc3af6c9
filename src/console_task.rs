//! Async console update loop.
//!
//! Text producers anywhere in the firmware push finished lines into an
//! Embassy [`Channel`]; [`console_update_task`] prints them, letting the
//! console scroll the framebuffer, and flushes the result to the OLED at
//! no more than [`DisplayConfig::update_frequency_hz`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal_async::i2c::I2c;
use heapless::String;

use crate::config::DisplayConfig;
use crate::console::Console;
use crate::driver::OledDriver;

/// Channel type carrying lines of at most `L` bytes, `D` lines deep.
pub type LineChannel<const L: usize, const D: usize> =
    Channel<CriticalSectionRawMutex, String<L>, D>;

/// Periodic console update loop.
///
/// This is a regular `async fn`: **not** an Embassy `#[task]`. Callers
/// should create a thin, concrete task wrapper that calls this function,
/// since Embassy tasks cannot be generic:
///
/// ```ignore
/// static LINES: LineChannel<32, 8> = Channel::new();
///
/// #[embassy_executor::task]
/// async fn oled_task(
///     driver: OledDriver<MyConcreteI2cType>,
///     console: Console<'static, 1024>,
///     config: DisplayConfig,
/// ) {
///     console_update_task(driver, console, &LINES, config).await;
/// }
/// ```
///
/// # Control flow
///
/// 1. Initialise the display hardware and show the current framebuffer.
/// 2. Loop:
///    - **Step 1**: Wait for a line.
///    - **Step 2**: Print it, then drain every line already queued so a
///      burst costs one flush.
///    - **Step 3**: Flush the framebuffer to hardware.
///    - **Step 4**: Sleep `config.update_period_ms()` to cap the rate.
///
/// # Errors
///
/// * Initialisation failure: logs the error and **returns** (task exits).
/// * Flush failure: logs the error and continues to the next cycle.
#[allow(clippy::needless_pass_by_value)] // config is small and consumed
pub async fn console_update_task<I2C, const N: usize, const L: usize, const D: usize>(
    mut driver: OledDriver<I2C>,
    mut console: Console<'static, N>,
    lines: &'static LineChannel<L, D>,
    config: DisplayConfig,
) where
    I2C: I2c,
{
    // ── Initialisation ───────────────────────────────────────────────
    if let Err(_e) = driver.init().await {
        #[cfg(feature = "defmt")]
        defmt::error!("OLED init failed: {}", _e);
        return;
    }
    if let Err(_e) = driver.flush(console.framebuffer()).await {
        #[cfg(feature = "defmt")]
        defmt::error!("Initial flush failed: {}", _e);
    }

    #[cfg(feature = "defmt")]
    defmt::info!("OLED console running");

    let period = embassy_time::Duration::from_millis(config.update_period_ms());

    // ── Main loop ────────────────────────────────────────────────────
    loop {
        // ── Step 1: wait for text ────────────────────────────────────
        let line = lines.receive().await;

        // ── Step 2: print this line and any already queued ───────────
        print_line(&mut console, &line);
        while let Ok(line) = lines.try_receive() {
            print_line(&mut console, &line);
        }

        // ── Step 3: flush to hardware ────────────────────────────────
        if let Err(_e) = driver.flush(console.framebuffer()).await {
            #[cfg(feature = "defmt")]
            defmt::error!("Flush failed: {}", _e);
        }

        // ── Step 4: rate limit ───────────────────────────────────────
        embassy_time::Timer::after(period).await;
    }
}

fn print_line<const N: usize>(console: &mut Console<'static, N>, line: &str) {
    for c in line.chars() {
        console.write_char(c);
    }
    console.new_line();
}
