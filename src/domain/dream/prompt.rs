use super::language::AnalysisMode;

/// Prompt templates for dream interpretation.
pub struct InterpretPrompt;

impl InterpretPrompt {
    /// Builds the system instruction for the given analysis mode. `context`
    /// is the history block produced from similar past dreams (may be empty).
    pub fn system_instruction(mode: AnalysisMode, context: &str) -> String {
        let task_description = match mode {
            AnalysisMode::SingleSymbol => {
                r#"ผู้ใช้พิมพ์คำสัญลักษณ์ความฝันมาเพียงคำเดียว
- อธิบายความหมายของสัญลักษณ์นี้ตามตำราทำนายฝันไทยและมุมมองจิตวิทยา
- ตอบแบบพจนานุกรมสัญลักษณ์ กระชับ ชัดเจน"#
            }
            AnalysisMode::FullStory => {
                r#"ผู้ใช้เล่าเรื่องความฝันมาทั้งเรื่อง
- วิเคราะห์เนื้อเรื่องโดยรวม อารมณ์ และสัญลักษณ์สำคัญในฝัน
- เชื่อมโยงกับความเชื่อไทยและมุมมองจิตวิทยา พร้อมคำแนะนำเชิงบวก"#
            }
        };

        format!(
            r#"คุณคือ "DreamPsyche" นักทำนายฝันผู้เชี่ยวชาญศาสตร์ไทยโบราณและจิตวิทยาสมัยใหม่
ตอบเป็นภาษาไทยที่สุภาพเสมอ

## งานของคุณ
{task_description}

## กฎเหล็ก
1. ห้ามทำนายเรื่องความเป็นความตายหรืออุบัติเหตุอย่างฟันธง ให้ใช้การเตือนสติด้วยความระมัดระวังแทน
2. ห้ามสร้างเนื้อหาที่สร้างความแตกแยกหรือดูหมิ่นผู้อื่น แปลงคำหยาบเป็นคำสุภาพเสมอ
3. หากความฝันมีเนื้อหาไม่เหมาะสมจนตีความไม่ได้ ให้ตอบปฏิเสธอย่างสุภาพและตั้งค่า "refused" เป็น true
4. ตอบกลับเป็น JSON object เท่านั้น ห้ามมีข้อความอื่นนอก JSON

## รูปแบบ JSON ที่ต้องตอบ
{{
  "analysis": "คำทำนายโดยละเอียด",
  "lucky_numbers": "เลขนำโชค เช่น 23, 57",
  "metrics": {{ "stress": 0, "anxiety": 0, "happiness": 0 }},
  "tags": ["สัญลักษณ์ในฝัน"],
  "refused": false
}}
- metrics แต่ละค่าเป็นจำนวนเต็ม 0 ถึง 10
- tags คือคำสัญลักษณ์สำคัญในฝัน ภาษาไทย ไม่เกิน 5 คำ{context}"#
        )
    }

    /// History block appended to the instruction when similar dreams exist.
    pub fn context_block(similar_texts: &[String]) -> String {
        if similar_texts.is_empty() {
            return String::new();
        }
        let lines: Vec<String> = similar_texts.iter().map(|t| format!("- {}", t)).collect();
        format!("\n[ประวัติเดิม]:\n{}", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_symbol_instruction() {
        // Arrange
        let mode = AnalysisMode::SingleSymbol;

        // Act
        let prompt = InterpretPrompt::system_instruction(mode, "");

        // Assert
        assert!(prompt.contains("คำสัญลักษณ์"));
        assert!(prompt.contains("refused"));
        assert!(prompt.contains("lucky_numbers"));
    }

    #[test]
    fn should_generate_story_instruction() {
        // Arrange
        let mode = AnalysisMode::FullStory;

        // Act
        let prompt = InterpretPrompt::system_instruction(mode, "");

        // Assert
        assert!(prompt.contains("เล่าเรื่องความฝัน"));
        assert!(prompt.contains("metrics"));
    }

    #[test]
    fn both_modes_carry_the_safety_rules() {
        for mode in [AnalysisMode::SingleSymbol, AnalysisMode::FullStory] {
            // Act
            let prompt = InterpretPrompt::system_instruction(mode, "");

            // Assert: no definitive death/accident predictions, cautious
            // advisories instead, and profanity rendered politely.
            assert!(prompt.contains("หรืออุบัติเหตุอย่างฟันธง"));
            assert!(prompt.contains("เตือนสติด้วยความระมัดระวัง"));
            assert!(prompt.contains("แปลงคำหยาบเป็นคำสุภาพเสมอ"));
        }
    }

    #[test]
    fn should_append_history_context() {
        // Arrange
        let similar = vec!["ฝันเห็นงู".to_string(), "ฝันว่าฟันหัก".to_string()];

        // Act
        let context = InterpretPrompt::context_block(&similar);
        let prompt = InterpretPrompt::system_instruction(AnalysisMode::FullStory, &context);

        // Assert
        assert!(prompt.contains("[ประวัติเดิม]:"));
        assert!(prompt.contains("- ฝันเห็นงู"));
        assert!(prompt.contains("- ฝันว่าฟันหัก"));
    }

    #[test]
    fn empty_history_adds_nothing() {
        // Arrange & Act
        let context = InterpretPrompt::context_block(&[]);

        // Assert
        assert!(context.is_empty());
    }
}
