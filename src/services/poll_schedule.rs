use std::pin::Pin;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior, Sleep};

/// Что разбудило цикл опроса
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    Tick,
    Deadline,
}

/// Расписание опроса: тики с фиксированным периодом и общий дедлайн.
///
/// `next()` ждёт ближайшее из двух событий. При совпадении по времени побеждает дедлайн.
/// Первый тик наступает через полный период после создания, а не сразу.
pub struct PollSchedule {
    ticker: Interval,
    deadline: Option<Pin<Box<Sleep>>>,
}

impl PollSchedule {
    /// `timeout: None` означает опрос без ограничения по времени
    pub fn new(period: Duration, timeout: Option<Duration>) -> Self {
        let start = Instant::now();
        let mut ticker = interval_at(start + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self {
            ticker,
            deadline: timeout.map(|t| Box::pin(tokio::time::sleep_until(start + t))),
        }
    }

    pub async fn next(&mut self) -> Wake {
        match self.deadline.as_mut() {
            Some(deadline) => tokio::select! {
                biased;
                _ = deadline.as_mut() => Wake::Deadline,
                _ = self.ticker.tick() => Wake::Tick,
            },
            None => {
                self.ticker.tick().await;
                Wake::Tick
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_deadline_before_first_tick() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(PERIOD, Some(Duration::from_millis(200)));

        assert_eq!(schedule.next().await, Wake::Deadline);
        assert_eq!(start.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_then_deadline() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(PERIOD, Some(Duration::from_millis(1200)));

        assert_eq!(schedule.next().await, Wake::Tick);
        assert_eq!(start.elapsed(), Duration::from_millis(500));
        assert_eq!(schedule.next().await, Wake::Tick);
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
        assert_eq!(schedule.next().await, Wake::Deadline);
        assert_eq!(start.elapsed(), Duration::from_millis(1200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_wins_tie_with_tick() {
        let mut schedule = PollSchedule::new(PERIOD, Some(Duration::from_millis(1000)));

        assert_eq!(schedule.next().await, Wake::Tick);
        assert_eq!(schedule.next().await, Wake::Deadline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_schedule_only_ticks() {
        let start = Instant::now();
        let mut schedule = PollSchedule::new(PERIOD, None);

        for _ in 0..5 {
            assert_eq!(schedule.next().await, Wake::Tick);
        }
        assert_eq!(start.elapsed(), Duration::from_millis(2500));
    }
}
