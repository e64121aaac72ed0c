#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SumStage {
    #[default]
    Loading,
    Summing,
    Saving,
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct SumStatus {
    pub progress: f32,
    pub scan_number: i32,
    pub stage: SumStage,
}

impl SumStatus {
    pub fn new(progress: f32, scan_number: i32, stage: SumStage) -> Self {
        Self {
            progress,
            scan_number,
            stage,
        }
    }
}
