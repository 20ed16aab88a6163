//! Staff dashboard figures derived from the queue

use chrono::{DateTime, Local, TimeZone, Timelike, Utc};
use medqueue_core::{QueueEntry, Triage};

/// Pending cases at which the dashboard raises the high-load warning
pub const HIGH_LOAD_THRESHOLD: usize = 10;

/// First hour of the traffic chart
const TRAFFIC_START_HOUR: u32 = 8;
/// Width of each traffic bucket in hours
const TRAFFIC_BUCKET_HOURS: u32 = 2;
/// 8am, 10am, ... 8pm
pub const TRAFFIC_BUCKETS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomStatus {
    Occupied,
    Available,
    Cleaning,
}

impl RoomStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RoomStatus::Occupied => "Occupied",
            RoomStatus::Available => "Available",
            RoomStatus::Cleaning => "Cleaning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Room {
    pub name: &'static str,
    pub status: RoomStatus,
}

/// Room board shown on the staff dashboard. Not backed by any data source.
pub const ROOMS: [Room; 4] = [
    Room {
        name: "OPD-1",
        status: RoomStatus::Occupied,
    },
    Room {
        name: "OPD-2",
        status: RoomStatus::Available,
    },
    Room {
        name: "ER-1",
        status: RoomStatus::Occupied,
    },
    Room {
        name: "ER-2",
        status: RoomStatus::Cleaning,
    },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriageBreakdown {
    pub red: usize,
    pub yellow: usize,
    pub green: usize,
}

/// One bar of the hourly traffic chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficBucket {
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueStats {
    /// Sum of fees over the whole queue
    pub revenue: f64,
    pub pending: usize,
    pub registered_today: usize,
    /// Mean minutes waited by pending entries; `None` for an empty queue
    pub average_wait_minutes: Option<i64>,
    pub triage: TriageBreakdown,
    pub traffic: Vec<TrafficBucket>,
}

impl QueueStats {
    /// Figures for `queue` as of now, in the local timezone
    pub fn compute(queue: &[QueueEntry]) -> Self {
        Self::compute_at(queue, Local::now())
    }

    /// Figures for `queue` as of `now`; "today" and the traffic hours are
    /// taken in `now`'s timezone.
    pub fn compute_at<Tz: TimeZone>(queue: &[QueueEntry], now: DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let now_utc = now.with_timezone(&Utc);

        let mut triage = TriageBreakdown::default();
        let mut traffic = [0usize; TRAFFIC_BUCKETS];
        let mut registered_today = 0;
        let mut total_wait = 0i64;

        for entry in queue {
            match entry.triage {
                Triage::Red => triage.red += 1,
                Triage::Yellow => triage.yellow += 1,
                Triage::Green => triage.green += 1,
            }
            total_wait += entry.waiting_minutes(now_utc);

            let local = entry.created_at.with_timezone(&tz);
            if local.date_naive() != today {
                continue;
            }
            registered_today += 1;
            if let Some(bucket) = traffic_bucket(local.hour()) {
                traffic[bucket] += 1;
            }
        }

        let pending = queue.len();
        Self {
            revenue: queue.iter().map(|e| e.fee).sum(),
            pending,
            registered_today,
            average_wait_minutes: (pending > 0).then(|| total_wait / pending as i64),
            triage,
            traffic: TRAFFIC_LABELS
                .into_iter()
                .zip(traffic)
                .map(|(label, count)| TrafficBucket { label, count })
                .collect(),
        }
    }

    pub fn high_load(&self) -> bool {
        self.pending >= HIGH_LOAD_THRESHOLD
    }

    /// Tallest traffic bar, at least 1 so charts can divide by it
    pub fn peak_traffic(&self) -> usize {
        self.traffic.iter().map(|b| b.count).max().unwrap_or(0).max(1)
    }
}

const TRAFFIC_LABELS: [&str; TRAFFIC_BUCKETS] =
    ["8am", "10am", "12pm", "2pm", "4pm", "6pm", "8pm"];

fn traffic_bucket(hour: u32) -> Option<usize> {
    let offset = hour.checked_sub(TRAFFIC_START_HOUR)?;
    let bucket = (offset / TRAFFIC_BUCKET_HOURS) as usize;
    (bucket < TRAFFIC_BUCKETS).then_some(bucket)
}
