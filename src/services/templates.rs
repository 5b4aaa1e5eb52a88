//! 非研究类查询的静态回复模板

use crate::models::research::Topic;

/// 操作指南模板
pub fn how_to(topic: &Topic) -> String {
    format!(
        "How to {topic}:

Here's a step-by-step guide for {topic}:

Step 1: Preparation
- Gather necessary materials and tools
- Understand the prerequisites
- Set up your workspace

Step 2: Planning
- Break down the task into smaller steps
- Create a timeline or checklist
- Identify potential challenges

Step 3: Execution
- Follow the steps systematically
- Take notes and document your progress
- Make adjustments as needed

Step 4: Review
- Check your work for accuracy
- Test the results
- Make improvements if necessary

Additional Tips:
- Start with simpler examples before tackling complex cases
- Don't hesitate to ask for help when needed
- Practice regularly to improve your skills

Would you like me to elaborate on any specific step or provide more detailed guidance for your particular situation?"
    )
}

/// 新闻类查询模板
pub fn news() -> String {
    "Current Events and News:

I understand you're looking for current news and events. Here's what I can tell you:

Recent Developments:
- Technology continues to advance rapidly
- Global events are shaping various industries
- New research and discoveries are being made regularly

Important Note:
For the most up-to-date and accurate news information, I recommend:
- Checking reputable news websites
- Following official sources and organizations
- Using news aggregators and apps
- Verifying information from multiple sources

Topics I Can Help With:
- General knowledge and background information
- Historical context and analysis
- Explanation of complex topics
- Research and fact-checking assistance

Would you like me to help you understand any specific topic or provide background information on current events?"
        .to_string()
}

/// 历史背景模板
pub fn history(topic: &Topic) -> String {
    format!(
        "Historical Context of {topic}:

Let me provide you with the historical background of {topic}:

Early Origins:
- Initial development and early concepts
- Key figures and contributors
- Historical milestones and breakthroughs

Evolution Over Time:
- Major developments and changes
- Periods of significant growth or decline
- Influence of historical events and context

Modern Era:
- Current state and recent developments
- Contemporary applications and uses
- Future prospects and trends

Historical Significance:
Understanding the history of {topic} is important because it:
- Provides context for current developments
- Helps explain why things are the way they are
- Offers insights into future possibilities
- Connects past achievements to present challenges

Key Historical Figures:
- Important contributors and their contributions
- Influential thinkers and practitioners
- Pioneers and innovators

Would you like me to focus on a specific time period or aspect of {topic}'s history?"
    )
}
