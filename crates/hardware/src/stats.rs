//! Transfer statistics collection and reporting.
//!
//! This module tracks what the converter did while it was being clocked. It provides:
//! 1. **Throughput:** Cycles, fetches, accepted beats, and delivered bytes.
//! 2. **Flow control:** Stall cycles where a beat was valid but the consumer was not ready.
//! 3. **Buffering:** High-water mark of the datapath buffers.
//! 4. **Outcomes:** Completed and aborted transfers.

use std::time::Instant;

/// Counters accumulated across every tick of a simulator.
#[derive(Clone, Debug)]
pub struct TransferStats {
    start_time: Instant,
    /// Total clock edges.
    pub cycles: u64,
    /// Source address advances issued.
    pub fetches: u64,
    /// Beats transferred by a valid/ready handshake.
    pub beats: u64,
    /// Strobed bytes carried by accepted beats.
    pub bytes_delivered: u64,
    /// Cycles with `valid && !ready`.
    pub stall_cycles: u64,
    /// Largest datapath buffer occupancy seen.
    pub buffer_high_water: usize,
    /// Transfers that ended with an ack.
    pub transfers_completed: u64,
    /// Transfers cut short by reset.
    pub transfers_aborted: u64,
}

impl Default for TransferStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            fetches: 0,
            beats: 0,
            bytes_delivered: 0,
            stall_cycles: 0,
            buffer_high_water: 0,
            transfers_completed: 0,
            transfers_aborted: 0,
        }
    }
}

impl TransferStats {
    /// Fraction of cycles that moved a beat.
    pub fn beat_rate(&self) -> f64 {
        if self.cycles == 0 {
            0.0
        } else {
            self.beats as f64 / self.cycles as f64
        }
    }

    /// Prints every statistic to stdout.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1);
        println!("\n==========================================================");
        println!("STREAM CONVERTER STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {}", self.cycles);
        println!("----------------------------------------------------------");
        println!("DATAPATH");
        println!("  source.fetches         {}", self.fetches);
        println!("  stream.beats           {}", self.beats);
        println!("  stream.bytes           {}", self.bytes_delivered);
        println!("  stream.beat_rate       {:.4}", self.beat_rate());
        println!(
            "  stream.stalls          {} ({:.2}%)",
            self.stall_cycles,
            (self.stall_cycles as f64 / cyc as f64) * 100.0
        );
        println!("  buffer.high_water      {}", self.buffer_high_water);
        println!("----------------------------------------------------------");
        println!("TRANSFERS");
        println!("  completed              {}", self.transfers_completed);
        println!("  aborted                {}", self.transfers_aborted);
        println!("==========================================================");
    }
}
