/// Prompt模板配置
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// 开头的说明性指令
    pub opening_instruction: String,
    /// 结尾的强调性指令
    pub closing_instruction: String,
}

impl PromptTemplate {
    /// 用材料填充模板，空段落不输出
    pub fn render(&self, material: &str) -> String {
        let mut prompt = String::new();

        prompt.push_str(self.opening_instruction.trim());
        prompt.push_str("\n\n");

        if !material.trim().is_empty() {
            prompt.push_str(material.trim_end());
            prompt.push_str("\n\n");
        }

        prompt.push_str(self.closing_instruction.trim());
        prompt.push('\n');
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_orders_sections() {
        let template = PromptTemplate {
            opening_instruction: "Open.".to_string(),
            closing_instruction: "Close.".to_string(),
        };

        assert_eq!(template.render("Body\n"), "Open.\n\nBody\n\nClose.\n");
        assert_eq!(template.render("  "), "Open.\n\nClose.\n");
    }
}
