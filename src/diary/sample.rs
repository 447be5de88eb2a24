//! Synthetic diary entries for trying the analyzer without writing one.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Emotion, TimeSlot};

/// Template sentence for one time slot and intended emotion
#[derive(Debug, Clone, Copy)]
pub struct SampleSentence {
    pub slot: TimeSlot,
    pub emotion: Emotion,
    pub text: &'static str,
}

const fn sentence(slot: TimeSlot, emotion: Emotion, text: &'static str) -> SampleSentence {
    SampleSentence {
        slot,
        emotion,
        text,
    }
}

// Each template holds a keyword of its own slot and none of a
// higher-priority slot, and ends with a single period.
pub const SAMPLE_SENTENCES: &[SampleSentence] = &[
    sentence(TimeSlot::Morning, Emotion::Happy, "아침 햇살이 좋아서 기분이 상쾌했다."),
    sentence(TimeSlot::Morning, Emotion::Love, "아침에 가족과 함께 식사하며 따뜻함을 느꼈다."),
    sentence(TimeSlot::Morning, Emotion::Sad, "출근길에 비가 와서 마음이 가라앉았다."),
    sentence(TimeSlot::Morning, Emotion::Anger, "오전 회의에서 억울한 말을 들어서 화가 났다."),
    sentence(TimeSlot::Morning, Emotion::Exhausted, "새벽까지 뒤척여서 하루 시작부터 너무 피곤했다."),
    sentence(TimeSlot::Morning, Emotion::Surprise, "등교하다가 오랜 친구를 우연히 만나서 깜짝 놀랐다."),
    sentence(TimeSlot::Midday, Emotion::Happy, "점심에 맛있는 음식을 먹어서 즐거웠다."),
    sentence(TimeSlot::Midday, Emotion::Love, "점심시간에 연인에게 다정한 메시지를 받았다."),
    sentence(TimeSlot::Midday, Emotion::Sad, "오후에 친구와 다퉈서 속상했다."),
    sentence(TimeSlot::Midday, Emotion::Anger, "점심 주문이 잘못 나와서 짜증이 났다."),
    sentence(TimeSlot::Midday, Emotion::Exhausted, "오후 내내 일이 많아서 지쳐 버렸다."),
    sentence(TimeSlot::Midday, Emotion::Surprise, "점심에 예상치 못한 선물을 받아서 놀랐다."),
    sentence(TimeSlot::Evening, Emotion::Happy, "저녁에 좋아하는 영화를 보며 행복했다."),
    sentence(TimeSlot::Evening, Emotion::Love, "밤에 사랑하는 사람과 통화하며 설렜다."),
    sentence(TimeSlot::Evening, Emotion::Sad, "밤에 혼자 있으니 조금 슬펐다."),
    sentence(TimeSlot::Evening, Emotion::Anger, "퇴근길 지하철에서 누가 밀쳐서 화가 났다."),
    sentence(TimeSlot::Evening, Emotion::Exhausted, "저녁을 먹자마자 피곤해서 바로 잠들었다."),
    sentence(TimeSlot::Evening, Emotion::Surprise, "밤하늘에 별똥별이 떨어져서 깜짝 놀랐다."),
];

/// Build a three-sentence diary: one random template per time slot, in
/// morning, midday, evening order.
pub fn generate_sample_diary<R: Rng + ?Sized>(rng: &mut R) -> String {
    TimeSlot::ALL
        .into_iter()
        .filter_map(|slot| {
            let candidates: Vec<&SampleSentence> =
                SAMPLE_SENTENCES.iter().filter(|s| s.slot == slot).collect();
            candidates.choose(&mut *rng).map(|s| s.text)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
