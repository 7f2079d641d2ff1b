use std::collections::VecDeque;

use crate::engine::{PublishSink, UpdateEvent, UpdateKind};

/// Channel values plotted for one bar. `None` means nothing was published.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub timestamp_ms: i64,
    pub values: Vec<Option<f64>>,
}

/// The chart side of the publish seam: keeps the plotted history the engine
/// itself does not keep.
#[derive(Debug, Clone)]
pub struct ChartSink {
    channel_count: usize,
    capacity: usize,
    bars: VecDeque<ChartBar>,
}

impl ChartSink {
    pub fn new(channel_count: usize, capacity: usize) -> Self {
        Self {
            channel_count,
            capacity: capacity.max(1),
            bars: VecDeque::with_capacity(capacity),
        }
    }

    /// Open the bar that following channel writes land on.
    /// Re-opening the current bar (a tick) keeps its values.
    pub fn begin_bar(&mut self, timestamp_ms: i64) {
        if self.bars.back().map(|b| b.timestamp_ms) == Some(timestamp_ms) {
            return;
        }
        if self.bars.len() == self.capacity {
            self.bars.pop_front();
        }
        self.bars.push_back(ChartBar {
            timestamp_ms,
            values: vec![None; self.channel_count],
        });
    }

    /// Route an update to its bar. A tick keeps writing into the current bar
    /// and only opens one when the chart is still empty.
    pub fn prepare(&mut self, event: &UpdateEvent) {
        match event.kind {
            UpdateKind::NewBar => self.begin_bar(event.timestamp_ms),
            UpdateKind::Tick if self.bars.is_empty() => self.begin_bar(event.timestamp_ms),
            UpdateKind::Tick => {}
        }
    }

    pub fn bars(&self) -> &VecDeque<ChartBar> {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// `(x, value)` points of one channel, `x` counting bars from the oldest kept.
    pub fn channel_points(&self, channel: usize) -> Vec<(f64, f64)> {
        self.bars
            .iter()
            .enumerate()
            .filter_map(|(x, bar)| {
                bar.values
                    .get(channel)
                    .copied()
                    .flatten()
                    .map(|v| (x as f64, v))
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.bars.clear();
    }
}

impl PublishSink for ChartSink {
    fn set_channel_value(&mut self, channel: usize, value: f64) {
        if let Some(slot) = self
            .bars
            .back_mut()
            .and_then(|bar| bar.values.get_mut(channel))
        {
            *slot = Some(value);
        } else {
            log::warn!("Dropped write to channel {} (no open bar or unknown channel)", channel);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins_within_a_bar() {
        let mut chart = ChartSink::new(2, 10);
        chart.begin_bar(100);
        chart.set_channel_value(0, 3.0);
        chart.begin_bar(100);
        chart.set_channel_value(0, 2.5);

        assert_eq!(chart.len(), 1);
        assert_eq!(chart.bars()[0].values, vec![Some(2.5), None]);
    }

    #[test]
    fn unpublished_channels_stay_empty() {
        let mut chart = ChartSink::new(4, 10);
        chart.begin_bar(100);
        chart.set_channel_value(0, 3.0);
        chart.set_channel_value(1, 0.0);
        chart.begin_bar(200);
        chart.set_channel_value(2, 0.0);
        chart.set_channel_value(3, -2.0);

        assert_eq!(chart.channel_points(0), vec![(0.0, 3.0)]);
        assert_eq!(chart.channel_points(3), vec![(1.0, -2.0)]);
        assert!(chart.channel_points(2).iter().all(|&(x, _)| x == 1.0));
    }

    #[test]
    fn oldest_bars_scroll_off() {
        let mut chart = ChartSink::new(2, 3);
        for ts in 0..5 {
            chart.begin_bar(ts);
            chart.set_channel_value(0, ts as f64);
        }

        assert_eq!(chart.len(), 3);
        assert_eq!(chart.bars()[0].timestamp_ms, 2);
        assert_eq!(chart.channel_points(0)[0], (0.0, 2.0));
    }

    #[test]
    fn ticks_update_the_open_bar() {
        let mut chart = ChartSink::new(2, 10);
        chart.prepare(&UpdateEvent::new_bar(100));
        chart.set_channel_value(0, 3.0);
        chart.prepare(&UpdateEvent::tick(105));
        chart.set_channel_value(0, 2.0);
        chart.prepare(&UpdateEvent::new_bar(200));
        chart.set_channel_value(1, -1.5);

        assert_eq!(chart.len(), 2);
        assert_eq!(chart.bars()[0].timestamp_ms, 100);
        assert_eq!(chart.bars()[0].values, vec![Some(2.0), None]);
        assert_eq!(chart.bars()[1].values, vec![None, Some(-1.5)]);
    }

    #[test]
    fn first_tick_opens_a_bar() {
        let mut chart = ChartSink::new(2, 10);
        chart.prepare(&UpdateEvent::tick(100));
        chart.set_channel_value(0, 1.5);

        assert_eq!(chart.len(), 1);
        assert_eq!(chart.channel_points(0), vec![(0.0, 1.5)]);
    }

    #[test]
    fn writes_without_a_bar_are_dropped() {
        let mut chart = ChartSink::new(2, 3);
        chart.set_channel_value(0, 1.0);
        chart.begin_bar(1);
        chart.set_channel_value(7, 1.0);

        assert_eq!(chart.bars()[0].values, vec![None, None]);
    }
}
